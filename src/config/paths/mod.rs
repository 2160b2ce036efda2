pub mod xdg_root;

pub use xdg_root::{cluster_store_dir, config_home, data_home, global_config_path};
