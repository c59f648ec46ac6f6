#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use jv_reflect as reflect;
pub use jv_utils as utils;
pub use jv_view as view;
