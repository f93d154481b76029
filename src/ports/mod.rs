/// Ports module defining interfaces for hexagonal architecture
///
/// The analysis core only consumes driven (outbound) ports: repositories,
/// the notification bus, the scanning engine and an observability hook.
pub mod outbound;
