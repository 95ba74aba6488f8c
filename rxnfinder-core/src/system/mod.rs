pub mod paths;

pub use paths::{
    default_config_path, generate_utc_timestamp, rxnfinder_home, rxnfinder_workspace_dir,
};
