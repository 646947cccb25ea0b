pub mod stream_watch;
