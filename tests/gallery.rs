use glyph_gallery::{
    Catalog, ColorPicker, ExportFormat, FAVORITES_KEY, Facet, Favorites, FilterState,
    GalleryConfig, KeyValueStore, MemoryStore, Mood, Notice, Rgb, Selection, Shape, SortOrder,
    TagIndex, TagMode, apply_filters, escape_csv, render,
};

const CATALOG: &str = r#"{"glyphs": [
    {
        "id": "ember",
        "tags": ["fire", "warm"],
        "glyph_url": "https://cdn.example/ember.png",
        "color": {
            "dominant": {"hex": "fe0101", "rgb": [254, 1, 1]},
            "secondary": {"hex": "331100", "rgb": [51, 17, 0]}
        },
        "metrics": {"edge_density": 0.2, "circularity": 0.9, "aspect_ratio": 1.0},
        "mood": "energetic",
        "created_at": {"date": "2024-03-02", "time": "10:00:00"}
    },
    {
        "id": "leaf",
        "tags": ["nature", "warm"],
        "glyph_url": "https://cdn.example/leaf.png",
        "color": {
            "dominant": {"hex": "00ff00", "rgb": [0, 255, 0]},
            "secondary": {"hex": "00ff00", "rgb": [0, 255, 0]}
        },
        "metrics": {"edge_density": 0.6, "circularity": 0.3, "aspect_ratio": 0.5},
        "mood": "calm",
        "created_at": {"date": "2024-05-20", "time": "08:15:00"}
    },
    {
        "id": "tide",
        "tags": ["nature"],
        "metrics": {"edge_density": 0.4, "circularity": 0.6, "aspect_ratio": 2.0},
        "created_at": {"date": "2023-12-31", "time": "23:59:59"}
    }
]}"#;

fn ids(catalog: &Catalog, favorites: &Favorites, state: &FilterState) -> Vec<String> {
    apply_filters(catalog, favorites, state, &GalleryConfig::default())
        .iter()
        .map(|m| m.entry.id.clone())
        .collect()
}

#[test]
fn empty_state_shows_everything_newest_first() {
    let catalog = Catalog::from_json(CATALOG).unwrap();
    assert_eq!(
        ids(&catalog, &Favorites::new(), &FilterState::new()),
        ["leaf", "ember", "tide"]
    );
    assert_eq!(
        ids(&catalog, &Favorites::new(), &FilterState::new().with_sort(SortOrder::Oldest)),
        ["tide", "ember", "leaf"]
    );
}

#[test]
fn and_is_narrower_than_or() {
    let catalog = Catalog::from_json(CATALOG).unwrap();
    let favorites = Favorites::new();
    let or = FilterState::new().toggle_tag("warm").toggle_tag("nature");
    let and = or.clone().with_tag_mode(TagMode::And);

    let any = ids(&catalog, &favorites, &or);
    let all = ids(&catalog, &favorites, &and);
    assert_eq!(any, ["leaf", "ember", "tide"]);
    assert_eq!(all, ["leaf"]);
    assert!(all.iter().all(|id| any.contains(id)));

    // Toggling a tag twice restores the previous result
    let back = and.clone().toggle_tag("fire").toggle_tag("fire");
    assert_eq!(ids(&catalog, &favorites, &back), all);
}

#[test]
fn picked_red_keeps_only_close_glyphs() {
    let catalog = Catalog::from_json(CATALOG).unwrap();
    let state = FilterState::new().with_picked_color(Some("#FF0000".parse::<Rgb>().unwrap()));
    let matches = apply_filters(&catalog, &Favorites::new(), &state, &GalleryConfig::default());

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].entry.id, "ember");
    assert!(matches[0].color_distance.unwrap() < 5.0);
}

#[test]
fn facets_and_search() {
    let catalog = Catalog::from_json(CATALOG).unwrap();
    let favorites = Favorites::new();

    let wide = FilterState::new().toggle_facet(Facet::Shape(Shape::Wide));
    assert_eq!(ids(&catalog, &favorites, &wide), ["tide"]);

    let calm = FilterState::new().toggle_facet(Facet::Mood(Mood::Calm));
    assert_eq!(ids(&catalog, &favorites, &calm), ["leaf"]);

    let search = FilterState::new().with_search("EMB");
    assert_eq!(ids(&catalog, &favorites, &search), ["ember"]);
}

#[test]
fn favorites_round_trip_through_store() {
    let catalog = Catalog::from_json(CATALOG).unwrap();
    let mut store = MemoryStore::new();
    let mut favorites = Favorites::load(&store);
    favorites.toggle(&mut store, "tide");
    assert_eq!(store.get(FAVORITES_KEY).as_deref(), Some(r#"["tide"]"#));

    let reloaded = Favorites::load(&store);
    let state = FilterState::new().toggle_favorites_only();
    assert_eq!(ids(&catalog, &reloaded, &state), ["tide"]);
}

#[test]
fn picker_to_view_to_export() {
    let catalog = Catalog::from_json(CATALOG).unwrap();
    let mut picker = ColorPicker::new();
    assert!(picker.input_hex("ff0000"));
    let state = picker.confirm(FilterState::new());

    let mut selection = Selection::new();
    selection.toggle("ember");
    let view = render(&catalog, &Favorites::new(), &selection, &state, &GalleryConfig::default());
    assert_eq!((view.total, view.showing), (3, 1));
    assert!(view.cards[0].selected);

    let csv = selection.download(&catalog, ExportFormat::Csv).unwrap().unwrap();
    assert!(selection.is_empty());
    let row = csv.contents.lines().nth(1).unwrap();
    assert!(row.starts_with("ember,,https://cdn.example/ember.png,fe0101,254,1,1,"));
    assert!(row.ends_with(",energetic,2024-03-02,10:00:00"));

    let state = picker.reset(state).with_search("nothing-here");
    let view = render(&catalog, &Favorites::new(), &selection, &state, &GalleryConfig::default());
    assert_eq!(view.notice, Some(Notice::Empty));
}

#[test]
fn tag_index_counts() {
    let catalog = Catalog::from_json(CATALOG).unwrap();
    let index = TagIndex::build(&catalog);
    assert_eq!(index.count("warm"), 2);
    assert_eq!(index.count("nature"), 2);
    assert_eq!(index.count("ice"), 0);
}

#[test]
fn csv_escaping() {
    assert_eq!(escape_csv(r#"a,"b""#), r#""a,""b""""#);
}
