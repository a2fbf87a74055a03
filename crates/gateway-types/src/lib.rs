pub mod caller;
pub mod id;
pub mod prelude;
pub mod route;
pub mod scope;
pub mod tenant;
pub mod trace;
pub mod validate;
