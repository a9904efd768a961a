use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use serde::{Deserialize, Serialize};

use crate::dom::selector::Selector;

pub const CONFIG_FILE_NAME: &str = ".timelensrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Ordered candidates for the comment section container. The first
    /// matching selector wins the search phase; all matching containers get
    /// observers.
    #[serde(default = "default_container_selectors")]
    pub container_selectors: Vec<String>,
    /// Ordered candidates for individual comment nodes; matches are unioned.
    #[serde(default = "default_comment_selectors")]
    pub comment_selectors: Vec<String>,
    #[serde(default = "default_content_selector")]
    pub content_selector: String,
    #[serde(default = "default_author_selector")]
    pub author_selector: String,
    /// Tags recognized as a whole comment thread.
    #[serde(default = "default_thread_tags")]
    pub thread_tags: Vec<String>,
    /// Tags recognized as a single comment renderer.
    #[serde(default = "default_leaf_tags")]
    pub leaf_tags: Vec<String>,
    /// Attribute marking containers that already carry an observer.
    #[serde(default = "default_observer_marker")]
    pub observer_marker: String,
}

fn default_container_selectors() -> Vec<String> {
    [
        "#comments",
        "ytd-comments",
        "#contents.ytd-item-section-renderer",
        "ytd-comments-header-renderer",
        "#comment-teaser",
        "ytd-comments#comments",
    ]
    .map(String::from)
    .to_vec()
}

fn default_comment_selectors() -> Vec<String> {
    [
        "ytd-comment-thread-renderer",
        "ytd-comment-renderer",
        "#comment #content-text",
        ".ytd-comment-renderer #content-text",
        r#"yt-formatted-string[id="content-text"]"#,
    ]
    .map(String::from)
    .to_vec()
}

fn default_content_selector() -> String {
    "#content-text".to_string()
}

fn default_author_selector() -> String {
    "#author-text".to_string()
}

fn default_thread_tags() -> Vec<String> {
    vec!["ytd-comment-thread-renderer".to_string()]
}

fn default_leaf_tags() -> Vec<String> {
    vec!["ytd-comment-renderer".to_string()]
}

fn default_observer_marker() -> String {
    "data-observer-attached".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            container_selectors: default_container_selectors(),
            comment_selectors: default_comment_selectors(),
            content_selector: default_content_selector(),
            author_selector: default_author_selector(),
            thread_tags: default_thread_tags(),
            leaf_tags: default_leaf_tags(),
            observer_marker: default_observer_marker(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any selector fails to parse.
    pub fn validate(&self) -> Result<()> {
        self.compile().map(|_| ())
    }

    /// Parse every configured selector.
    pub fn compile(&self) -> Result<SelectorSet> {
        let parse_list = |field: &str, list: &[String]| -> Result<Vec<Selector>> {
            list.iter()
                .map(|raw| {
                    Selector::parse(raw)
                        .with_context(|| format!("Invalid selector in '{field}': \"{raw}\""))
                })
                .collect()
        };

        Ok(SelectorSet {
            containers: parse_list("containerSelectors", &self.container_selectors)?,
            comments: parse_list("commentSelectors", &self.comment_selectors)?,
            content: Selector::parse(&self.content_selector).with_context(|| {
                format!("Invalid selector in 'contentSelector': \"{}\"", self.content_selector)
            })?,
            author: Selector::parse(&self.author_selector).with_context(|| {
                format!("Invalid selector in 'authorSelector': \"{}\"", self.author_selector)
            })?,
            threads: parse_list("threadTags", &self.thread_tags)?,
            leaves: parse_list("leafTags", &self.leaf_tags)?,
            observer_marker: self.observer_marker.clone(),
        })
    }
}

/// The compiled form of [`Config`] the collector works with.
#[derive(Debug, Clone)]
pub struct SelectorSet {
    pub containers: Vec<Selector>,
    pub comments: Vec<Selector>,
    pub content: Selector,
    pub author: Selector,
    pub threads: Vec<Selector>,
    pub leaves: Vec<Selector>,
    pub observer_marker: String,
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
