pub mod distribute;
pub mod local;

pub use distribute::{
    distribute_artifact, DistributeError, DistributeRequest, DistributeResult, Distributor,
};
pub use local::LocalDistributor;
