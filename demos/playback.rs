use std::cell::Cell;
use std::time::Duration;

use video_buffer::backend::raster::{RasterAllocator, RasterFrame};
use video_buffer::{
    BufferConfig, FrameBuffer, PixelFormat, ReadySignal, ReadyState, Size, Surface, VideoSource,
};

const SIZE: Size = Size {
    width: 64,
    height: 36,
};
const FPS: f64 = 30.0;
const LOOP_FRAMES: u64 = 45;

/// A fake looping video. Each frame is a solid shade; on loop restart the
/// decoder stalls for a few ticks, still reporting the last position while
/// presenting a black frame.
struct LoopingVideo {
    tick: Cell<u64>,
    shades: Vec<Vec<u8>>,
    black: Vec<u8>,
}

impl LoopingVideo {
    fn new() -> Self {
        let pixels = (SIZE.width * SIZE.height) as usize;
        let shades = (0..LOOP_FRAMES)
            .map(|i| [(i * 5) as u8, 64, 128, 255].repeat(pixels))
            .collect();
        Self {
            tick: Cell::new(0),
            shades,
            black: [0, 0, 0, 255].repeat(pixels),
        }
    }

    fn advance(&self) {
        self.tick.set(self.tick.get() + 1);
    }

    /// Frame index and whether the decoder is still settling after a loop.
    fn position(&self) -> (u64, bool) {
        // Three stalled ticks after every loop restart.
        let period = LOOP_FRAMES + 3;
        let t = self.tick.get() % period;
        if t >= LOOP_FRAMES {
            (LOOP_FRAMES - 1, true)
        } else {
            (t, false)
        }
    }
}

impl VideoSource for LoopingVideo {
    type Frame<'a> = RasterFrame<'a>;

    fn ready_state(&self) -> ReadyState {
        ReadyState::HAVE_ENOUGH_DATA
    }

    fn current_time(&self) -> Duration {
        let (frame, _) = self.position();
        Duration::from_secs_f64(frame as f64 / FPS)
    }

    fn native_size(&self) -> Size {
        SIZE
    }

    fn current_frame(&self) -> Option<RasterFrame<'_>> {
        let (frame, settling) = self.position();
        let data = if settling {
            &self.black
        } else {
            &self.shades[frame as usize]
        };
        Some(RasterFrame::packed(data, PixelFormat::Rgba8, SIZE))
    }

    fn on_can_play_through(&self, signal: ReadySignal) {
        signal.fire();
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(json) => serde_json::from_str(&json).expect("invalid config json"),
        None => BufferConfig::default(),
    };
    println!("Buffering with {config:?}");

    let mut buffer = FrameBuffer::builder(LoopingVideo::new(), RasterAllocator)
        .config(config)
        .on_release_texture(|surface| {
            tracing::trace!(size = ?surface.size(), "release texture");
        })
        .build();

    let mut flashes = 0;
    for _ in 0..(LOOP_FRAMES * 2 + 6) {
        if let Some(surface) = buffer.query() {
            let px = surface.as_rgba().get_pixel(0, 0).0;
            if px[..3] == [0, 0, 0] {
                flashes += 1;
            }
            println!(
                "t={:.3}s sampled={:?} pixel={:?}",
                buffer.video().current_time().as_secs_f64(),
                buffer.last_sampled_time().map(|t| t.as_secs_f64()),
                px,
            );
        }
        buffer.video().advance();
    }

    println!("\nDone. {flashes} black frame(s) shown.");
}
