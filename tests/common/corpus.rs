//! Fixture content tree

use kgraph::{BuildConfig, ContentLoader};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const POST_IDS: [&str; 3] = ["getting-started", "ownership", "lifetimes"];
pub const BOOK_IDS: [&str; 3] = ["book-dune", "book-children-of-dune", "book-neuromancer"];

const GETTING_STARTED: &str = "---
title: Getting Started
summary: Installing the toolchain
api-type: post
tags: [rust, beginners]
series: Rust Basics
series_order: 1
---
Next up is [ownership](./ownership.md). See also [about me](../about.md)
and [an old post](gone.md).
";

const OWNERSHIP: &str = "---
title: Ownership
api-type: post
tags: [rust, memory]
series: Rust Basics
series_order: 2
---
Start with [the setup post](getting-started.md).
";

const LIFETIMES: &str = "---
title: Lifetimes
api-type: post
tags: [rust, memory, advanced]
series: Rust Basics
series_order: \"3\"
---
No links here.
";

const ABOUT: &str = "---
title: About
api-id: about
---
Who writes this.
";

const DRAFT: &str = "---
title: Work in progress
tags: [rust]
---
";

const BROKEN: &str = "---
title: [never closed
---
";

const READING_LIST: &str = "reading_list:
  - title: Dune
    author: Frank Herbert
    genre: scifi
    status: finished
    rating: 5
  - title: Children of Dune
    author: Frank Herbert
    genre: scifi
    status: reading
  - title: Neuromancer
    author: William Gibson
    genre: scifi
    status: finished
";

/// A site on disk under `<tempdir>/content`
pub struct FixtureSite {
    dir: TempDir,
}

impl FixtureSite {
    pub fn create() -> Self {
        let site = Self {
            dir: TempDir::new().expect("create temp dir"),
        };
        site.write("blog/2024-01-01-getting-started.md", GETTING_STARTED);
        site.write("blog/2024-01-08-ownership.md", OWNERSHIP);
        site.write("blog/2024-01-15-lifetimes.md", LIFETIMES);
        site.write("about.md", ABOUT);
        site.write("drafts/wip.md", DRAFT);
        site.write("broken.md", BROKEN);
        site.write("_data/reading_list.yml", READING_LIST);
        site
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn content_path(&self) -> PathBuf {
        self.root().join("content")
    }

    pub fn output_path(&self) -> PathBuf {
        self.root().join("site/graph.json")
    }

    /// Config matching the layout, drafts excluded
    pub fn config(&self) -> BuildConfig {
        BuildConfig {
            content_path: self.content_path(),
            file_patterns: vec!["**/*.md".to_string(), "_data/*.yml".to_string()],
            exclude_patterns: vec!["**/drafts/**".to_string()],
            output_path: Some(self.output_path()),
            ..BuildConfig::default()
        }
    }

    pub fn loader(&self) -> ContentLoader {
        ContentLoader::from_config(&self.config()).expect("valid patterns")
    }

    pub fn write(&self, rel: &str, text: &str) {
        let path = self.content_path().join(rel);
        fs::create_dir_all(path.parent().expect("has parent")).expect("create dirs");
        fs::write(path, text).expect("write fixture");
    }
}
