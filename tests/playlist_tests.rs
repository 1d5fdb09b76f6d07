//! Playlist behaviour: ordered iteration, removal, shuffled copies.

use entity_registry::playlist::Playlist;
use entity_registry::RegistryError;

#[test]
fn add_and_remove_preserve_order() {
    let playlist = Playlist::from_titles(["Lost Stars", "Gravity", "Yellow"]).unwrap();
    playlist.add("Clocks").unwrap();
    playlist.add("Fix You").unwrap();

    assert!(playlist.remove("Gravity").unwrap());
    assert!(!playlist.remove("Gravity").unwrap());

    assert_eq!(playlist.snapshot(), ["Lost Stars", "Yellow", "Clocks", "Fix You"]);
    assert_eq!(playlist.len(), 4);
}

#[test]
fn remove_drops_only_first_duplicate() {
    let playlist = Playlist::from_titles(["Yellow", "Clocks", "Yellow"]).unwrap();
    playlist.remove("Yellow").unwrap();
    assert_eq!(playlist.snapshot(), ["Clocks", "Yellow"]);
}

#[test]
fn iteration_restarts_from_the_first_track() {
    let playlist = Playlist::from_titles(["Clocks", "Yellow"]).unwrap();

    let once: Vec<_> = playlist.iter().collect();
    let twice: Vec<_> = playlist.iter().collect();
    assert_eq!(once, twice);
    assert_eq!(playlist.iter().next().as_deref(), Some("Clocks"));
}

#[test]
fn shuffle_returns_new_playlist_and_keeps_original() {
    let titles = ["Lost Stars", "Yellow", "Clocks", "Fix You", "Gravity"];
    let playlist = Playlist::from_titles(titles).unwrap();

    let shuffled = playlist.shuffle().unwrap();
    assert_ne!(shuffled.id(), "");
    assert_eq!(playlist.snapshot(), titles);

    let mut a = shuffled.snapshot();
    let mut b = playlist.snapshot();
    a.sort();
    b.sort();
    assert_eq!(a, b);
}

#[test]
fn blank_title_is_rejected() {
    let playlist = Playlist::new();
    let res = playlist.add("  ");
    assert!(matches!(res, Err(RegistryError::InvalidAttributes { kind, .. }) if kind == "song"));
    assert!(playlist.is_empty());
}

#[test]
fn title_added_with_whitespace_is_removed_by_same_string() {
    let playlist = Playlist::new();
    playlist.add(" Clocks ").unwrap();
    assert_eq!(playlist.snapshot(), [" Clocks "]);

    assert!(!playlist.remove("Clocks").unwrap());
    assert!(playlist.remove(" Clocks ").unwrap());
    assert!(playlist.is_empty());
}
