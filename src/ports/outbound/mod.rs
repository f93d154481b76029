/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the analysis core uses to reach the
/// inventory store, the association store, the notification bus, the concrete
/// scanning engine and the console.
pub mod association_repository;
pub mod dependency_repository;
pub mod inventory_repository;
pub mod notification_bus;
pub mod progress_reporter;
pub mod vulnerability_finder;

pub use association_repository::AssociationRepository;
pub use dependency_repository::DependencyRepository;
pub use inventory_repository::{InventoryRepository, PageRequest};
pub use notification_bus::NotificationBus;
pub use progress_reporter::ProgressReporter;
pub use vulnerability_finder::VulnerabilityFinder;
