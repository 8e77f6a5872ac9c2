//! Pipeline stages for thumbnail generation.
//!
//! Each submodule implements exactly one step, so the rendering backend
//! can change without touching discovery, resizing or encoding.
//!
//! ## Data Flow
//!
//! ```text
//! discover ──▶ render ──▶ thumbnail ──▶ encode
//! (*.pdf)    (page 1)   (fit box)     (JPEG)
//! ```
//!
//! 1. [`discover`]  — list matching PDFs in name order and assign
//!    `pagina_NN.jpg` output names
//! 2. [`render`]    — rasterise pages via poppler or pdfium
//! 3. [`thumbnail`] — shrink the first page into the bounding box
//! 4. [`encode`]    — JPEG-encode and replace the output file

pub mod discover;
pub mod encode;
pub mod render;
pub mod thumbnail;
