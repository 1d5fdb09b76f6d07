//! Playlist: a local (non-global) registry of tracks that iterates in
//! insertion order and can hand out shuffled copies.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::registry::{Attributes, EntityKind, Registry, RegistryError};

const PLAYLIST_ID_LEN: usize = 6;
const PLAYLIST_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    Song,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("song")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
}

impl EntityKind for TrackKind {
    type Record = Track;

    const FAMILY: &'static str = "track";

    fn from_tag(tag: &str) -> Option<Self> {
        tag.trim().eq_ignore_ascii_case("song").then_some(TrackKind::Song)
    }

    fn tags() -> &'static [&'static str] {
        &["song"]
    }

    fn build(&self, attrs: &Attributes) -> Result<Track, RegistryError> {
        Ok(Track {
            title: attrs.required_str(self, "title")?,
        })
    }
}

pub struct Playlist {
    id: String,
    tracks: Registry<TrackKind>,
}

impl Playlist {
    pub fn new() -> Self {
        Self {
            id: random_id(),
            tracks: Registry::new(),
        }
    }

    /// Builds a playlist from titles, in order. Fails on the first blank title.
    pub fn from_titles<I, S>(titles: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let playlist = Self::new();
        for title in titles {
            playlist.add(title.as_ref())?;
        }
        Ok(playlist)
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn add(&self, title: &str) -> Result<(), RegistryError> {
        self.tracks
            .create_kind(TrackKind::Song, &Attributes::new().with("title", title))
            .map(|_| ())
    }

    /// Removes the first track titled `title`. Returns whether one was found.
    pub fn remove(&self, title: &str) -> Result<bool, RegistryError> {
        match self.tracks.find(|t| t.record().title == title) {
            Some(track) => {
                self.tracks.remove(track.id())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Titles in insertion order. Restartable: each call begins at the first
    /// track.
    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        self.tracks.iter().map(|t| t.record().title.clone())
    }

    pub fn len(&self) -> usize {
        self.tracks.count()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Owned copy of the titles.
    pub fn snapshot(&self) -> Vec<String> {
        self.iter().collect()
    }

    /// New playlist with the same titles in random order. `self` is left
    /// untouched.
    pub fn shuffle(&self) -> Result<Playlist, RegistryError> {
        let mut titles = self.snapshot();
        titles.shuffle(&mut rand::thread_rng());
        Playlist::from_titles(titles)
    }
}

impl Default for Playlist {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let titles = self.snapshot();
        write!(f, "Playlist#{} ({} songs): {}", self.id, titles.len(), titles.join(", "))
    }
}

fn random_id() -> String {
    let mut rng = rand::thread_rng();
    (0..PLAYLIST_ID_LEN)
        .map(|_| char::from(PLAYLIST_ID_CHARSET[rng.gen_range(0..PLAYLIST_ID_CHARSET.len())]))
        .collect()
}
