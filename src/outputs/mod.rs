//! Output generation for extracted records.
//!
//! # Submodules
//!
//! - [`csv`]: Writes bonus records and partner tables to CSV files
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── bonuses.csv                  # Bank, Airline, Transfer Bonus, Expiration
//! ├── partners_airline_partners.csv
//! └── partners_hotel_partners.csv  # one file per partner table
//! ```
//!
//! Existing files are overwritten without warning. Writes are not atomic.

pub mod csv;
