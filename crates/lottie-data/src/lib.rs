// lottie-data: Serde structs for the Lottie JSON format
pub mod model;
