//! Command-line front end: filter a catalog file and print or export the matches.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use glyph_gallery::{
    Catalog, CatalogEntry, ExportFormat, FAVORITES_KEY, Facet, Favorites, FilterState,
    GalleryConfig, GalleryError, Harmony, MemoryStore, Mood, Result, Rgb, SearchScope, Shape,
    SortOrder, TagMode, apply_filters, copy_urls, download,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Export {
    Json,
    Csv,
    Urls,
}

/// Filter, sort and export a glyph catalog.
#[derive(Debug, Parser)]
#[command(name = "glyph-gallery", version)]
struct Args {
    /// Catalog JSON: a plain array or `{ "glyphs": [...] }`.
    catalog: PathBuf,

    /// Active tag (repeatable).
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Require every tag instead of any.
    #[arg(long)]
    and: bool,

    /// Case-insensitive substring search.
    #[arg(long)]
    search: Option<String>,

    #[arg(long)]
    mood: Option<Mood>,

    #[arg(long)]
    shape: Option<Shape>,

    #[arg(long)]
    harmony: Option<Harmony>,

    /// Keep glyphs close to this colour (#RRGGBB).
    #[arg(long)]
    color: Option<Rgb>,

    #[arg(long, value_enum, default_value_t = SortOrder::Newest)]
    sort: SortOrder,

    /// JSON file holding an array of favorite ids.
    #[arg(long)]
    favorites: Option<PathBuf>,

    #[arg(long, requires = "favorites")]
    favorites_only: bool,

    /// Gallery config JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    scope: Option<SearchScope>,

    /// Maximum LAB distance for --color.
    #[arg(long)]
    threshold: Option<f64>,

    #[arg(long, value_enum)]
    export: Option<Export>,

    /// Write the export here instead of stdout.
    #[arg(long, requires = "export")]
    out: Option<PathBuf>,
}

impl Args {
    fn filter_state(&self) -> FilterState {
        let mut state = self
            .tags
            .iter()
            .fold(FilterState::new(), |state, tag| state.toggle_tag(tag))
            .with_tag_mode(if self.and { TagMode::And } else { TagMode::Or })
            .with_favorites_only(self.favorites_only)
            .with_picked_color(self.color)
            .with_sort(self.sort);
        if let Some(search) = &self.search {
            state = state.with_search(search.as_str());
        }
        let facets = [
            self.mood.map(Facet::Mood),
            self.shape.map(Facet::Shape),
            self.harmony.map(Facet::Harmony),
        ];
        facets.into_iter().flatten().fold(state, FilterState::toggle_facet)
    }

    fn gallery_config(&self) -> Result<GalleryConfig> {
        let mut config = match &self.config {
            Some(path) => GalleryConfig::from_json(&fs::read_to_string(path)?)
                .map_err(GalleryError::Config)?,
            None => GalleryConfig::default(),
        };
        if let Some(scope) = self.scope {
            config = config.with_search_scope(scope);
        }
        if let Some(threshold) = self.threshold {
            config = config.with_color_threshold(threshold);
        }
        Ok(config)
    }
}

fn load_favorites(path: Option<&PathBuf>) -> Result<Favorites> {
    let Some(path) = path else {
        return Ok(Favorites::new());
    };
    let store = MemoryStore::with_value(FAVORITES_KEY, fs::read_to_string(path)?);
    Ok(Favorites::load(&store))
}

fn write_export(entries: &[&CatalogEntry], export: Export, out: Option<&PathBuf>) -> Result<()> {
    let contents = match export {
        Export::Urls => {
            let mut clipboard = String::new();
            copy_urls(entries, &mut clipboard).then_some(clipboard)
        }
        Export::Json => download(entries, ExportFormat::Json)?.map(|a| a.contents),
        Export::Csv => download(entries, ExportFormat::Csv)?.map(|a| a.contents),
    };
    let Some(contents) = contents else {
        log::warn!("nothing to export");
        return Ok(());
    };
    match out {
        Some(path) => {
            fs::write(path, contents)?;
            log::info!("wrote {} entries to {}", entries.len(), path.display());
        }
        None => println!("{contents}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let catalog = Catalog::from_reader(BufReader::new(File::open(&args.catalog)?))?;
    let favorites = load_favorites(args.favorites.as_ref())?;
    let config = args.gallery_config()?;
    let state = args.filter_state();

    let matches = apply_filters(&catalog, &favorites, &state, &config);
    log::info!("{} of {} glyphs match", matches.len(), catalog.len());

    if let Some(export) = args.export {
        let entries: Vec<&CatalogEntry> = matches.iter().map(|m| m.entry).collect();
        return write_export(&entries, export, args.out.as_ref());
    }

    if matches.is_empty() {
        eprintln!("No glyphs found");
    }
    for m in &matches {
        match m.color_distance {
            Some(distance) => println!("{}\t{distance:.2}", m.entry.id),
            None => println!("{}", m.entry.id),
        }
    }
    Ok(())
}
