//! Catalog listing: one scan of the audio directory, grouped by base name.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use tokio::fs;
use tracing::debug;

use crate::config::Config;
use crate::error::AudioServerError;
use crate::resolver::is_servable_name;

/// One audio asset and every format it is available in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioEntry {
    pub name: String,
    pub url: String,
    pub extensions: Vec<String>,
}

/// Build the playback URL for a base name.
pub fn playback_url(prefix: &str, name: &str) -> String {
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        urlencoding::encode(name)
    )
}

/// Split a directory entry name into (base name, extension) when the
/// extension is one of the configured formats and the base name is one the
/// streamer will accept.
fn split_supported<'a>(config: &Config, file_name: &'a str) -> Option<(&'a str, usize)> {
    let (base, ext) = file_name.rsplit_once('.')?;
    if !is_servable_name(base) {
        return None;
    }
    let priority = config.priority(ext)?;
    Some((base, priority))
}

/// Scan `root` once and return the catalog, sorted by name.
///
/// Fails as a whole if the directory cannot be enumerated.
pub async fn list_catalog(root: &Path, config: &Config) -> Result<Vec<AudioEntry>, AudioServerError> {
    let mut entries = fs::read_dir(root)
        .await
        .map_err(AudioServerError::DirectoryUnreadable)?;

    // base name -> priorities of the formats found
    let mut grouped: HashMap<String, Vec<usize>> = HashMap::new();

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(AudioServerError::DirectoryUnreadable)?
    {
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            debug!("Skipping non UTF-8 entry: {:?}", entry.file_name());
            continue;
        };

        let Some((base, priority)) = split_supported(config, file_name) else {
            continue;
        };

        // Follows symlinks; dangling links and directories are left out.
        match fs::metadata(entry.path()).await {
            Ok(metadata) if metadata.is_file() => {}
            _ => continue,
        }

        let found = grouped.entry(base.to_string()).or_default();
        if !found.contains(&priority) {
            found.push(priority);
        }
    }

    let mut catalog: Vec<AudioEntry> = grouped
        .into_iter()
        .map(|(name, mut priorities)| {
            priorities.sort_unstable();
            AudioEntry {
                url: playback_url(&config.url_prefix, &name),
                extensions: priorities
                    .into_iter()
                    .map(|p| config.formats[p].extension.clone())
                    .collect(),
                name,
            }
        })
        .collect();

    catalog.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(files: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for file in files {
            std::fs::write(temp_dir.path().join(file), b"data").unwrap();
        }
        temp_dir
    }

    #[test]
    fn test_playback_url() {
        assert_eq!(playback_url("/audio", "song"), "/audio/song");
        assert_eq!(playback_url("/audio/", "song"), "/audio/song");
        assert_eq!(playback_url("/audio", "my song"), "/audio/my%20song");
    }

    #[test]
    fn test_split_supported() {
        let config = Config::default();
        assert_eq!(split_supported(&config, "song.m4a"), Some(("song", 0)));
        assert_eq!(split_supported(&config, "a.b.mp3"), Some(("a.b", 1)));
        assert_eq!(split_supported(&config, "song.MP3"), None);
        assert_eq!(split_supported(&config, "notes.txt"), None);
        assert_eq!(split_supported(&config, ".mp3"), None);
        assert_eq!(split_supported(&config, "README"), None);
        assert_eq!(split_supported(&config, "live..take2.mp3"), Some(("live..take2", 1)));
        assert_eq!(split_supported(&config, "..mp3"), None);
        assert_eq!(split_supported(&config, "...mp3"), None);
        assert_eq!(split_supported(&config, "a\\b.mp3"), None);
    }

    #[tokio::test]
    async fn test_groups_formats_by_base_name() {
        let dir = setup(&["song.mp3", "song.m4a", "track.mp3", "cover.jpg"]);
        let catalog = list_catalog(dir.path(), &Config::default()).await.unwrap();

        assert_eq!(
            catalog,
            vec![
                AudioEntry {
                    name: "song".to_string(),
                    url: "/audio/song".to_string(),
                    extensions: vec!["m4a".to_string(), "mp3".to_string()],
                },
                AudioEntry {
                    name: "track".to_string(),
                    url: "/audio/track".to_string(),
                    extensions: vec!["mp3".to_string()],
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_ignores_directories_and_nested_files() {
        let dir = setup(&["song.m4a"]);
        std::fs::create_dir(dir.path().join("album.mp3")).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/deep.mp3"), b"data").unwrap();

        let catalog = list_catalog(dir.path(), &Config::default()).await.unwrap();
        let names: Vec<_> = catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["song"]);
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let dir = setup(&[]);
        let catalog = list_catalog(dir.path(), &Config::default()).await.unwrap();
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let result = list_catalog(&missing, &Config::default()).await;
        assert!(matches!(result, Err(AudioServerError::DirectoryUnreadable(_))));
    }
}
