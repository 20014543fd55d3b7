pub mod detection;
pub mod io;
pub mod network;
pub mod request;
pub mod system;
