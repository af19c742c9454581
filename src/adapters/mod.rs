//! Production adapters for the collaborator ports
//!
//! Each adapter shells out to the corresponding command-line tool and maps
//! its exit status and output onto the job error taxonomy.

pub mod ffmpeg;
pub mod ffprobe;
pub mod ytdlp;

pub use ffmpeg::FfmpegTranscoder;
pub use ffprobe::FfprobeInspector;
pub use ytdlp::YtDlpResolver;
