//! The `FreshContainerMonitor` custom resource.

mod v1alpha1;

pub use self::v1alpha1::FreshContainerMonitor;
