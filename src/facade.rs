// facade.rs - Handle-based entry points (open / process / finish / close)
//
// A UContext owns the shared Property Table and a table of open pipelines.
// Callers hold plain `UHandle` values; a closed handle is detected through
// its generation, and a handle from another context through the context id.
// Both are reported as U_INVALID_HANDLE instead of touching a slot.

use std::mem::ManuallyDrop;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::encodings;
use crate::ucnv::UConverter;
use crate::udata::u_init;
use crate::unicode::PropertyTable;
use crate::unorm2::{UNormalizer, UNormalizer2};
use crate::utypes::*;

/// An opaque reference to an open pipeline in a [`UContext`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UHandle {
    context: u32,
    index: u32,
    generation: u32,
}

static NEXT_CONTEXT_ID: AtomicU32 = AtomicU32::new(0);

/// What a handle does with the bytes fed to it.
#[derive(Clone, Debug)]
enum Pipeline {
    /// Decode `source`, encode as `target`.
    Converter {
        source: UConverter,
        target: UConverter,
    },
    /// Decode, normalize, and encode back to the same charset.
    Normalizer {
        codec: UConverter,
        normalizer: UNormalizer,
    },
}

impl Pipeline {
    fn run(&mut self, input: &[u8], flush: bool) -> Result<Vec<u8>, UErrorCode> {
        let mut code_points = Vec::with_capacity(input.len());
        let mut out = Vec::with_capacity(input.len());
        match self {
            Pipeline::Converter { source, target } => {
                source
                    .to_unicode(input, flush, &mut code_points)
                    .map_err(|e| e.code)?;
                target
                    .from_unicode(&code_points, &mut out)
                    .map_err(|e| e.code)?;
            }
            Pipeline::Normalizer { codec, normalizer } => {
                let mut decoded = Vec::with_capacity(input.len());
                codec
                    .to_unicode(input, flush, &mut decoded)
                    .map_err(|e| e.code)?;
                normalizer.normalize_incremental(&decoded, &mut code_points)?;
                if flush {
                    normalizer.flush(&mut code_points);
                }
                codec
                    .from_unicode(&code_points, &mut out)
                    .map_err(|e| e.code)?;
            }
        }
        Ok(out)
    }

    fn reset(&mut self) {
        match self {
            Pipeline::Converter { source, .. } => source.reset(),
            Pipeline::Normalizer { codec, normalizer } => {
                codec.reset();
                normalizer.reset();
            }
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    pipeline: Option<Pipeline>,
}

/// Process context: the Property Table plus every open handle.
///
/// A context is used from one thread at a time; open one context per
/// thread (they can share the same table) for concurrent streams.
#[derive(Debug)]
pub struct UContext {
    id: u32,
    table: Arc<PropertyTable>,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl UContext {
    /// Create a context over the process-wide data.
    pub fn new() -> Result<UContext, UErrorCode> {
        let table = u_init().map_err(|e| e.code)?;
        Ok(UContext::with_table(table))
    }

    /// Create a context over an explicitly loaded table.
    pub fn with_table(table: Arc<PropertyTable>) -> UContext {
        UContext {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
            table,
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn table(&self) -> &Arc<PropertyTable> {
        &self.table
    }

    /// Number of handles currently open.
    pub fn open_handles(&self) -> usize {
        self.slots.iter().filter(|s| s.pipeline.is_some()).count()
    }

    fn insert(&mut self, pipeline: Pipeline) -> UHandle {
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.pipeline = Some(pipeline);
                UHandle {
                    context: self.id,
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    pipeline: Some(pipeline),
                });
                UHandle {
                    context: self.id,
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };
        debug!(index = handle.index, generation = handle.generation, "opened handle");
        handle
    }

    fn pipeline(&mut self, h: UHandle) -> Result<&mut Pipeline, UErrorCode> {
        let slot = if h.context == self.id {
            self.slots.get_mut(h.index as usize)
        } else {
            None
        };
        match slot {
            Some(Slot {
                generation,
                pipeline: Some(p),
            }) if *generation == h.generation => Ok(p),
            _ => {
                debug!(
                    context = h.context,
                    index = h.index,
                    generation = h.generation,
                    "invalid handle"
                );
                Err(U_INVALID_HANDLE)
            }
        }
    }

    /// Open a transcoding handle from `source` to `target` charset.
    pub fn open_converter(
        &mut self,
        source: &str,
        target: &str,
        mode: ErrorMode,
    ) -> Result<UHandle, UErrorCode> {
        let source = UConverter::new(encodings::lookup(source)?, mode);
        let target = UConverter::new(encodings::lookup(target)?, mode);
        Ok(self.insert(Pipeline::Converter { source, target }))
    }

    /// Open a normalizing handle for text in `encoding`.
    pub fn open_normalizer(
        &mut self,
        form: NormalizationForm,
        encoding: &str,
        mode: ErrorMode,
    ) -> Result<UHandle, UErrorCode> {
        let codec = UConverter::new(encodings::lookup(encoding)?, mode);
        let normalizer = UNormalizer::open(UNormalizer2::new(self.table.clone(), form));
        Ok(self.insert(Pipeline::Normalizer { codec, normalizer }))
    }

    /// Feed a chunk; returns the output that is already final.
    ///
    /// A failed call leaves the handle as it was before the call.
    pub fn process(&mut self, h: UHandle, input: &[u8]) -> Result<Vec<u8>, UErrorCode> {
        Self::run_atomic(self.pipeline(h)?, input, false)
    }

    /// End the stream: emit everything still held back and make the handle
    /// ready for a new stream.
    pub fn finish(&mut self, h: UHandle) -> Result<Vec<u8>, UErrorCode> {
        let pipeline = self.pipeline(h)?;
        let out = Self::run_atomic(pipeline, &[], true)?;
        pipeline.reset();
        Ok(out)
    }

    /// Like [`UContext::process`], writing into `dest`.
    ///
    /// Returns the output length. When `dest` is too small the status is
    /// `U_BUFFER_TOO_SMALL` with the required length, and the handle is
    /// unchanged so the call can be repeated with a larger buffer.
    pub fn process_into(&mut self, h: UHandle, input: &[u8], dest: &mut [u8]) -> (usize, UErrorCode) {
        let pipeline = match self.pipeline(h) {
            Ok(p) => p,
            Err(code) => return (0, code),
        };
        let snapshot = pipeline.clone();
        let out = match pipeline.run(input, false) {
            Ok(out) => out,
            Err(code) => {
                *pipeline = snapshot;
                return (0, code);
            }
        };
        if out.len() > dest.len() {
            *pipeline = snapshot;
            return (out.len(), U_BUFFER_TOO_SMALL);
        }
        dest[..out.len()].copy_from_slice(&out);
        (out.len(), U_ZERO_ERROR)
    }

    fn run_atomic(pipeline: &mut Pipeline, input: &[u8], flush: bool) -> Result<Vec<u8>, UErrorCode> {
        let snapshot = pipeline.clone();
        pipeline.run(input, flush).inspect_err(|_| *pipeline = snapshot)
    }

    /// Drop buffered state without closing the handle.
    pub fn reset(&mut self, h: UHandle) -> Result<(), UErrorCode> {
        self.pipeline(h)?.reset();
        Ok(())
    }

    /// Close a handle. Closing twice, or a handle from another context,
    /// fails with `U_INVALID_HANDLE`.
    pub fn close(&mut self, h: UHandle) -> Result<(), UErrorCode> {
        self.pipeline(h)?;
        let slot = &mut self.slots[h.index as usize];
        slot.pipeline = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(h.index);
        debug!(index = h.index, generation = h.generation, "closed handle");
        Ok(())
    }

    /// Wrap `h` so that it is closed when the guard goes out of scope.
    pub fn scoped(&mut self, h: UHandle) -> ScopedHandle<'_> {
        ScopedHandle { ctx: self, handle: h }
    }
}

/// A handle that closes itself on drop, on every exit path.
pub struct ScopedHandle<'a> {
    ctx: &'a mut UContext,
    handle: UHandle,
}

impl ScopedHandle<'_> {
    pub fn handle(&self) -> UHandle {
        self.handle
    }

    pub fn process(&mut self, input: &[u8]) -> Result<Vec<u8>, UErrorCode> {
        self.ctx.process(self.handle, input)
    }

    pub fn process_into(&mut self, input: &[u8], dest: &mut [u8]) -> (usize, UErrorCode) {
        self.ctx.process_into(self.handle, input, dest)
    }

    pub fn finish(&mut self) -> Result<Vec<u8>, UErrorCode> {
        self.ctx.finish(self.handle)
    }

    /// Give up ownership without closing.
    pub fn into_handle(self) -> UHandle {
        ManuallyDrop::new(self).handle
    }
}

impl Drop for ScopedHandle<'_> {
    fn drop(&mut self) {
        // Already-closed handles are fine here.
        let _ = self.ctx.close(self.handle);
    }
}
