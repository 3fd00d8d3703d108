// lib.rs      gifwire crate.
//
// Copyright (c) 2019-2026  Douglas Lau
//
//! GIF encoding from typed blocks.
//!
//! Each block is a validated, immutable value which knows how to render
//! itself as GIF wire-format bytes ([ByteStreamSource]).  A
//! [DocumentBuilder] arranges blocks in grammar order, producing a
//! [Document] which can be encoded into a byte buffer or any writer.
//!
//! [ByteStreamSource]: trait.ByteStreamSource.html
//! [Document]: struct.Document.html
//! [DocumentBuilder]: struct.DocumentBuilder.html
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

pub mod block;
pub mod byte_math;
mod document;
mod error;
pub mod palette;
mod scalar;
mod stream;

pub use crate::document::{Document, DocumentBuilder};
pub use crate::error::{Error, Result};
pub use crate::scalar::{
    AspectRatio, CanvasHeight, CanvasWidth, ColorIndex, ColorResolution,
    DelayTime,
};
pub use crate::stream::ByteStreamSource;
