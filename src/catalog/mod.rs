//! Reference protein catalog storage.
//!
//! The catalog holds the reference proteins that results are reported in,
//! each with its chains and the number given to each chain's first residue.
//! An embedded catalog is compiled into the binary, but custom catalogs can
//! also be loaded from JSON files.
//!
//! ## Embedded Catalog
//!
//! - **4HMG**: H3 hemagglutinin, HA1 and HA2 numbered from 1 ("145 in HA1")
//! - **4JTV**: H1 hemagglutinin, HA1 numbered from 7 ("151 of HA1")
//!
//! ## Example
//!
//! ```rust
//! use renumber::ReferenceCatalog;
//! use renumber::core::types::ReferenceId;
//!
//! // Load embedded catalog
//! let catalog = ReferenceCatalog::load_embedded().unwrap();
//!
//! // Get a specific reference
//! let h3 = catalog.get(&ReferenceId::new("4HMG")).unwrap();
//! let label = h3.label(1).unwrap();
//! assert_eq!((label.residue, label.number, label.chain), ('Q', 1, "HA1"));
//! ```
//!
//! ## Custom Catalogs
//!
//! Custom catalogs can be created by exporting and modifying the embedded catalog:
//!
//! ```rust,no_run
//! use renumber::ReferenceCatalog;
//! use std::path::Path;
//!
//! // Export to JSON
//! let catalog = ReferenceCatalog::load_embedded().unwrap();
//! let json = catalog.to_json().unwrap();
//!
//! // Load from custom file
//! let custom = ReferenceCatalog::load_from_file(Path::new("my_catalog.json")).unwrap();
//! ```

pub mod store;
