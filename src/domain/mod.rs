// Domain types and value objects
pub mod plate;
pub mod well;

// Re-export commonly used types
pub use plate::{PlateGrid, PlateSize};
pub use well::{natural_sort_wells, split_well_label, well_sort_key};
