pub mod credentials;
pub mod management;
pub mod script;
