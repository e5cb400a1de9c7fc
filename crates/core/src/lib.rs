//! Subtitle generation core: word-level transcription, cue segmentation and
//! the SubRip codec.

pub mod shared {
    pub mod constants;
    pub mod timestamp;
}

pub mod transcription {
    pub mod domain {
        pub mod transcriber;
        pub mod word;
    }
    pub mod infrastructure {
        pub mod google_speech_transcriber;
    }
}

pub mod segmentation {
    pub mod domain {
        pub mod cue;
        pub mod cue_segmenter;
        pub mod grouping_policy;
    }
}

pub mod subtitles {
    pub mod domain {
        pub mod srt_decoder;
        pub mod srt_encoder;
        pub mod subtitle_writer;
    }
    pub mod infrastructure {
        pub mod srt_file_reader;
        pub mod srt_file_writer;
    }
}

pub mod pipeline {
    pub mod generate_subtitles_use_case;
}
