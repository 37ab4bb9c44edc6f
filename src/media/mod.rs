/// Media metadata module
///
/// This module handles:
/// - Tag keys and their labels (tags.rs)
/// - Extension to media kind classification (kind.rs)

pub mod kind;
pub mod tags;
