//! Output generation.
//!
//! # Submodules
//!
//! - [`json`]: writes the collected chapels to a single JSON array file
//!
//! # Output Structure
//!
//! ```text
//! chapels.json
//! [
//!   {
//!     "name": "Capilla San Pío X",
//!     "address": "Calle 50, Ciudad de Panamá, Panamá",
//!     "phone": "+50761234567",
//!     "website": "https://…",
//!     "comments": "Misa dominical 10:00",
//!     "latitude": 8.98,
//!     "longitude": -79.52
//!   }
//! ]
//! ```

pub mod json;
