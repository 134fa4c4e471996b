//! Observation encoding for learning agents driving the step environment.
//!
//! ## Usage
//!
//! ```rust
//! use dix_mille::core::GameConfig;
//! use dix_mille::game::DixMilleEnv;
//! use dix_mille::nn::ObservationEncoder;
//!
//! let config = GameConfig::default();
//! let encoder = ObservationEncoder::new(&config);
//! let mut env = DixMilleEnv::new(config, 42).unwrap();
//!
//! let state = env.reset().unwrap();
//! let encoded = encoder.encode(&state);
//! assert_eq!(encoded.len(), encoder.feature_count());
//! ```

pub mod encoder;

pub use encoder::{EncodedState, ObservationEncoder};
