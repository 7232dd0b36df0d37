//! Core data types for alignment-based renumbering.
//!
//! - [`SequenceRecord`]: a header plus a (possibly gapped) residue string
//! - [`AlignedSet`]: ordered records sharing one alignment width
//! - [`KnownReference`]: a reference protein with chains and its own numbering
//! - [`ReferenceId`], [`Correspondence`]: catalog keys and mapping outcomes
//!
//! ## Numbering
//!
//! All public positions are 1-based sequential numbers, counting residues
//! only. Gap symbols (`-`) introduced by alignment are never counted.
//!
//! [`SequenceRecord`]: record::SequenceRecord
//! [`AlignedSet`]: alignment::AlignedSet
//! [`KnownReference`]: reference::KnownReference
//! [`ReferenceId`]: types::ReferenceId
//! [`Correspondence`]: types::Correspondence

pub mod alignment;
pub mod record;
pub mod reference;
pub mod types;
