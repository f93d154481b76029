/// Application layer - Use cases and DTOs
///
/// This layer drives the analysis core: the batch scanner walks the
/// inventory, and each analyzer's batch routine applies routing, association
/// tracking and notification emission.
pub mod dto;
pub mod use_cases;
