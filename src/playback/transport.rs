//! Audio output behind a small trait so the player can be driven without a
//! sound device.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::TimeBase;

use crate::error::{Error, Result};

/// Playback controls the player needs from an audio backend.
pub trait Transport {
    /// Resume or start output.
    fn play(&mut self) -> Result<()>;

    /// Pause output, keeping the current source.
    fn pause(&mut self);

    /// Restart output at `position`, preserving the paused/playing state.
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Total length of the media, when the decoder knows it.
    fn duration(&self) -> Option<Duration>;

    /// Whether the queued media has been played to the end.
    fn is_finished(&self) -> bool;

    /// Display name of the loaded media.
    fn name(&self) -> &str;
}

/// `rodio`-backed transport playing a single file.
pub struct RodioTransport {
    path: PathBuf,
    name: String,
    duration: Option<Duration>,
    sink: Sink,
    handle: OutputStreamHandle,
    // Dropping the stream stops all output.
    _stream: OutputStream,
}

impl RodioTransport {
    /// Open the default output device and queue `path`, paused at zero.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let (stream, handle) = OutputStream::try_default()?;

        let decoder = decode(&path)?;
        let duration = read_duration(&path).or_else(|| decoder.total_duration());
        let sink = Sink::try_new(&handle)?;
        sink.pause();
        sink.append(decoder);

        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        tracing::info!("Opened audio {} (duration {:?})", path.display(), duration);

        Ok(Self {
            path,
            name,
            duration,
            sink,
            handle,
            _stream: stream,
        })
    }
}

/// Read the track length from the container headers.
///
/// rodio's decoders do not report a length for MP3 or Vorbis. symphonia does:
/// `start_ts + n_frames` in the track's time base.
pub fn read_duration(path: &Path) -> Option<Duration> {
    let file = File::open(path).ok()?;

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let opened = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| tracing::debug!("Could not read headers of {}: {e}", path.display()))
        .ok()?;

    let params = &opened.format.default_track()?.codec_params;
    let frames = params.start_ts + params.n_frames?;
    let time_base = match params.time_base {
        Some(tb) => tb,
        None => TimeBase::new(1, params.sample_rate.filter(|r| *r > 0)?),
    };
    let time = time_base.calc_time(frames);

    Duration::try_from_secs_f64(time.frac)
        .ok()
        .map(|frac| Duration::from_secs(time.seconds) + frac)
}

fn decode(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path).map_err(|e| Error::io(e, path.to_path_buf()))?;
    Ok(Decoder::new(BufReader::new(file))?)
}

impl Transport for RodioTransport {
    fn play(&mut self) -> Result<()> {
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        let was_paused = self.sink.is_paused();
        let decoder = decode(&self.path)?;

        let sink = Sink::try_new(&self.handle)?;
        if was_paused {
            sink.pause();
        }
        sink.append(decoder.skip_duration(position));

        self.sink.stop();
        self.sink = sink;
        tracing::debug!("Seeked {} to {:?}", self.name, position);
        Ok(())
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
