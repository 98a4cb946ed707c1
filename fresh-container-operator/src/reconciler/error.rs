use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("{source}"))]
    Oracle { source: crate::oracle::Error },

    #[snafu(display(
        "Failed to get FreshContainerMonitor {name} in namespace {namespace}, error: {source}"
    ))]
    GetMonitor {
        namespace: String,
        name: String,
        #[snafu(source(from(kube::Error, Box::new)))]
        source: Box<kube::Error>,
    },

    #[snafu(display("Cannot list deployments, error: {source}"))]
    ListDeployments {
        #[snafu(source(from(kube::Error, Box::new)))]
        source: Box<kube::Error>,
    },

    #[snafu(display(
        "Failed to update deployment {name} in namespace {namespace}, error: {source}"
    ))]
    UpdateDeployment {
        namespace: String,
        name: String,
        #[snafu(source(from(kube::Error, Box::new)))]
        source: Box<kube::Error>,
    },
}

impl From<crate::oracle::Error> for Error {
    fn from(source: crate::oracle::Error) -> Self { Self::Oracle { source } }
}
