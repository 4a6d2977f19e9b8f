//! # Reinhardt Dependency Injection
//!
//! Request-scoped type registry for Reinhardt handlers.
//!
//! ## Features
//!
//! - **Typed**: values are keyed by their static type, trait objects included
//! - **Scoped**: one registry per request, never shared between requests
//! - **Pooled**: registries are wiped and reused instead of reallocated
//!
//! ## Example
//!
//! ```rust
//! use reinhardt_di::ScopePool;
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct Fixed;
//!
//! impl Clock for Fixed {
//!     fn now(&self) -> u64 {
//!         1_700_000_000
//!     }
//! }
//!
//! let pool = Arc::new(ScopePool::new(16));
//! let scope = pool.checkout();
//!
//! scope.bind("request-1".to_string()).unwrap();
//! scope.bind_as::<dyn Clock>(Arc::new(Fixed)).unwrap();
//!
//! assert_eq!(*scope.resolve::<String>().unwrap(), "request-1");
//! assert_eq!(scope.resolve::<dyn Clock>().unwrap().now(), 1_700_000_000);
//!
//! // Dropping the guard wipes the registry and returns it to the pool.
//! drop(scope);
//! assert_eq!(pool.available(), 1);
//! ```

pub mod error;
pub mod key;
pub mod pool;
pub mod registry;
pub mod scope;

pub use error::{DiError, DiResult};
pub use key::TypeKey;
pub use pool::{DEFAULT_MAX_IDLE, PooledScope, ScopePool};
pub use registry::Registry;
pub use scope::Scope;
