//! Integration tests driving the playback core through fake voice and
//! notification collaborators

pub mod manager;
