//! geoprox-cli
//! ===========
//!
//! Command-line front end for the `geoprox-core` proximity engine.
//!
//! This crate primarily provides a binary (`geoprox-cli`). The library target
//! only exists so docs.rs renders this overview.
//!
//! Basic usage:
//!
//! ```text
//! geoprox-cli --facilities-file facilities.json.gz countries
//! geoprox-cli --facilities-url <url> --schools-url <url> -c Afghanistan -r 5 proximity
//! geoprox-cli --facilities-file facilities.json --schools-url <url> stats Afghanistan
//! geoprox-cli resolve "Côte d'Ivoire"
//! ```
//!
//! Set `RUST_LOG=geoprox_core=debug` to watch pagination.
#![cfg_attr(docsrs, feature(doc_cfg))]
