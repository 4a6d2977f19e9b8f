//! Injected handlers.
//!
//! A handler is a plain function. Its parameters are resolved from the
//! request scope and its return values are written to the response:
//!
//! | Return type | Response |
//! |---|---|
//! | `()` | whatever the handler wrote through its `ResponseWriter` |
//! | `T` | `T` as the body: bytes verbatim, anything else as JSON |
//! | `Result<(), E>` | `E` through the status translator on error |
//! | `Result<T, E>` / `(T, E)` | `E` on error, `T` otherwise |

pub mod func;
pub mod marshal;
pub mod output;
pub mod resolve;
pub mod returns;
pub mod signature;

pub use func::{HandlerFunc, IntoHandlerFunc};
pub use marshal::marshal;
pub use output::{Capability, Json, JsonValue, Output, Returned};
pub use resolve::Resolve;
pub use returns::{HandlerReturn, OutputSlot};
pub use signature::{HandlerDescriptor, ReturnShape, SignatureError, classify};
