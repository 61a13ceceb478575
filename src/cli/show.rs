use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use termcolor::BufferWriter;

use crate::{
    document::DocumentSet,
    options::{Grouping, LeafLabel, PanelOptions},
    outline::write_outline,
    panel::BufferListPanel,
    session::Session,
    widget::HeadlessWidget,
};

use super::GlobalOptions;

/// Opens every document in a session file and prints the resulting tree.
#[derive(Debug, Parser)]
pub struct ShowCommand {
    /// Path to the session file, one document path per line.
    pub session: PathBuf,

    /// Panel options file (TOML). Flags below override its values.
    #[clap(long)]
    pub options: Option<PathBuf>,

    /// Sort names and paths case-sensitively.
    #[clap(long)]
    pub case_sensitive: bool,

    /// List every directory directly under the root instead of nesting.
    #[clap(long)]
    pub flat: bool,

    /// Show full paths for documents instead of file names.
    #[clap(long)]
    pub full_paths: bool,

    /// Expand every directory. Otherwise only the current document's
    /// directories are expanded.
    #[clap(long)]
    pub expand_all: bool,
}

impl ShowCommand {
    pub fn run(self, global: GlobalOptions) -> anyhow::Result<()> {
        let session = Session::read(&self.session).with_context(|| {
            format!("Could not load session {}", self.session.display())
        })?;
        let options = self.panel_options()?;

        let documents = Arc::new(DocumentSet::new());
        let mut panel =
            BufferListPanel::new(Arc::clone(&documents), HeadlessWidget::new(), options);

        let mut current = None;
        for entry in session.entries() {
            let document = documents.open(entry.path.as_str());
            if entry.current {
                current = Some(document.id());
            }
        }

        let handled = panel.process_events();
        let rebuilds = panel.run_idle_tasks();
        log::debug!(
            "Handled {} document events with {} rebuild(s)",
            handled,
            rebuilds
        );

        if let Some(id) = current {
            panel.set_current_document(id);
        }
        if self.expand_all {
            panel.expand_all();
        }

        let widget = panel.widget();
        let writer = BufferWriter::stdout(global.color.into());
        let mut buffer = writer.buffer();
        write_outline(
            panel.display_tree(),
            panel.current_document(),
            &|id| widget.is_expanded(id),
            &mut buffer,
        )?;
        writer.print(&buffer)?;

        Ok(())
    }

    fn panel_options(&self) -> anyhow::Result<PanelOptions> {
        let mut options = match &self.options {
            Some(path) => PanelOptions::load(path)
                .with_context(|| format!("Could not load options from {}", path.display()))?,
            None => PanelOptions::default(),
        };

        if self.case_sensitive {
            options.case_sensitive = true;
        }
        if self.flat {
            options.grouping = Grouping::Flat;
        }
        if self.full_paths {
            options.leaf_label = LeafLabel::FullPath;
        }

        Ok(options)
    }
}
