//! Code 39 barcodes and retail price tags.
//! - Sanitizes SKUs and encodes them as Code 39 bar/space elements
//! - Lays the elements out on a canvas of any width, exactly filling it
//! - Renders SVG previews and tag sheets for browser printing
//! - Builds EPL2 jobs (one label per tag) with pixel-exact bitmap barcodes
//!
//! ```
//! let layout = code39_tags::render("rt-482917", 200.0, 60.0).unwrap();
//! assert_eq!(layout.label, "RT-482917");
//! assert_eq!(layout.bars.len(), 11 * 5);
//! ```

pub mod builder;
pub mod config;
pub mod consts;
pub mod encoder;
pub mod epl;
pub mod graphics;
pub mod layout;
pub mod logging;
pub mod svg;
pub mod symbology;
pub mod tag;

pub use builder::{build_epl_job, build_sheet_svg};
pub use config::{ConfigError, TagConfig};
pub use encoder::{encode, sanitize, EncodedData};
pub use layout::{layout, render, BarGeometry, BarcodeLayout, LayoutError};
pub use svg::{barcode_svg, render_svg, SvgStyle};
pub use symbology::{lookup, verify_table, Code39Symbol, Element, SymbologyError, Width};
pub use tag::{Catalog, PriceTag, PrintLayout, TagError};
