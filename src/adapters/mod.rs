// Adapters layer: concrete implementations of the domain ports.

pub mod export;
pub mod geolocation;
pub mod supabase;
