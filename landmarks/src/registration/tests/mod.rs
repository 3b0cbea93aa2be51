//! End-to-end registration scenarios.
//!
//! - `rigid`: translations and single-axis rotations
//! - `constrained`: DOF masks, duplicates and scaling
//! - `randomized`: seeded random landmark sets and concurrent runs
//! - `transform_file`: fitted transforms written to and read from disk

mod constrained;
mod randomized;
