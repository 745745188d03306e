//! Layouts: documents interleaved with blank-line padding.

use serde::Serialize;

use super::{Paginate, TextLines};

/// Why a padding block was inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PadKind {
    /// Pushes the next document to a fresh page. Counts as whitespace cost.
    PageAligned,
    /// Visual gap of at most two lines after a document. Free.
    Separator,
}

/// A run of blank lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Padding {
    /// Number of blank lines.
    pub lines: usize,
    /// Why the padding exists.
    pub kind: PadKind,
}

/// One element of a [`Layout`].
#[derive(Debug)]
pub enum Segment<'a, D> {
    /// A document, with its position in the input slice.
    Document {
        /// Index into the slice handed to the aligner.
        index: usize,
        /// The document itself.
        document: &'a D,
    },
    /// Blank lines.
    Padding(Padding),
}

impl<D> Clone for Segment<'_, D> {
    fn clone(&self) -> Self {
        match self {
            Self::Document { index, document } => Self::Document {
                index: *index,
                document: *document,
            },
            Self::Padding(padding) => Self::Padding(*padding),
        }
    }
}

impl<D: Paginate> Segment<'_, D> {
    /// Number of lines this segment occupies.
    pub fn line_count(&self) -> usize {
        match self {
            Self::Document { document, .. } => document.line_count(),
            Self::Padding(padding) => padding.lines,
        }
    }
}

/// An ordered arrangement of documents and padding for one page capacity.
#[derive(Debug)]
pub struct Layout<'a, D> {
    segments: Vec<Segment<'a, D>>,
    page_capacity: usize,
}

impl<'a, D: Paginate> Layout<'a, D> {
    /// An empty layout.
    pub fn empty(page_capacity: usize) -> Self {
        Self {
            segments: Vec::new(),
            page_capacity,
        }
    }

    /// Lay out `documents` in `order` for pages of `page_capacity` lines.
    ///
    /// Applies the same placement rules the aligner scores with, so the
    /// resulting [`whitespace_cost`](Self::whitespace_cost) equals the score.
    pub(crate) fn build(documents: &'a [D], order: &[usize], page_capacity: usize) -> Self {
        let mut segments = Vec::with_capacity(order.len() * 3);
        let mut space = page_capacity;

        for &index in order {
            let document = &documents[index];
            let tail = document.line_count() % page_capacity;

            if space < tail {
                push_padding(&mut segments, space, PadKind::PageAligned);
            }

            segments.push(Segment::Document { index, document });
            space = page_capacity - tail;

            let gap = space.min(super::SEPARATOR_LINES);
            push_padding(&mut segments, gap, PadKind::Separator);
            space -= gap;
        }

        Self {
            segments,
            page_capacity,
        }
    }

    /// The segments in output order.
    pub fn segments(&self) -> &[Segment<'a, D>] {
        &self.segments
    }

    /// Page capacity this layout was built for.
    pub fn page_capacity(&self) -> usize {
        self.page_capacity
    }

    /// Check if the layout has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Input indices of the documents, in output order.
    pub fn order(&self) -> Vec<usize> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Document { index, .. } => Some(*index),
                Segment::Padding(_) => None,
            })
            .collect()
    }

    /// Documents in output order.
    pub fn documents(&self) -> impl Iterator<Item = &'a D> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Document { document, .. } => Some(*document),
            Segment::Padding(_) => None,
        })
    }

    /// Total page-aligned padding lines.
    pub fn whitespace_cost(&self) -> usize {
        self.padding_lines(PadKind::PageAligned)
    }

    /// Total separator lines.
    pub fn separator_lines(&self) -> usize {
        self.padding_lines(PadKind::Separator)
    }

    fn padding_lines(&self, kind: PadKind) -> usize {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Padding(padding) if padding.kind == kind => padding.lines,
                _ => 0,
            })
            .sum()
    }

    /// Total lines in the flattened output.
    pub fn total_lines(&self) -> usize {
        self.segments.iter().map(Segment::line_count).sum()
    }

    /// Pages needed to print the flattened output.
    pub fn page_count(&self) -> usize {
        self.total_lines().div_ceil(self.page_capacity)
    }

    /// Owned, serializable description of this layout.
    pub fn plan(&self) -> LayoutPlan {
        let mut entries = Vec::with_capacity(self.segments.len());
        let mut start_line = 0;

        for segment in &self.segments {
            let entry = match segment {
                Segment::Document { index, document } => PlanEntry::Document {
                    index: *index,
                    label: document.label(),
                    lines: document.line_count(),
                    start_line,
                },
                Segment::Padding(padding) => PlanEntry::Padding {
                    lines: padding.lines,
                    kind: padding.kind,
                    start_line,
                },
            };
            start_line += segment.line_count();
            entries.push(entry);
        }

        LayoutPlan {
            page_capacity: self.page_capacity,
            whitespace_cost: self.whitespace_cost(),
            separator_lines: self.separator_lines(),
            total_lines: self.total_lines(),
            page_count: self.page_count(),
            entries,
        }
    }
}

impl<D: TextLines> Layout<'_, D> {
    /// Flatten the layout into newline-terminated text.
    pub fn render(&self) -> String {
        let mut text = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Document { document, .. } => {
                    for line in document.lines() {
                        text.push_str(line);
                        text.push('\n');
                    }
                }
                Segment::Padding(padding) => {
                    text.extend(std::iter::repeat_n('\n', padding.lines));
                }
            }
        }
        text
    }
}

fn push_padding<D>(segments: &mut Vec<Segment<'_, D>>, lines: usize, kind: PadKind) {
    if lines > 0 {
        segments.push(Segment::Padding(Padding { lines, kind }));
    }
}

/// One entry of a [`LayoutPlan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum PlanEntry {
    /// A document.
    #[serde(rename_all = "camelCase")]
    Document {
        /// Index among the loaded inputs.
        index: usize,
        /// Display name, usually the path.
        label: Option<String>,
        /// Line count including banner and companion.
        lines: usize,
        /// 0-indexed output line where the document starts.
        start_line: usize,
    },
    /// Blank lines.
    #[serde(rename_all = "camelCase")]
    Padding {
        /// Number of blank lines.
        lines: usize,
        /// Why the padding exists.
        kind: PadKind,
        /// 0-indexed output line where the padding starts.
        start_line: usize,
    },
}

/// Owned summary of a layout, for display and JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPlan {
    /// Lines per page.
    pub page_capacity: usize,
    /// Page-aligned padding lines.
    pub whitespace_cost: usize,
    /// Separator lines.
    pub separator_lines: usize,
    /// Lines in the flattened output.
    pub total_lines: usize,
    /// Pages in the flattened output.
    pub page_count: usize,
    /// Segments in output order.
    pub entries: Vec<PlanEntry>,
}

impl LayoutPlan {
    /// Input indices in output order.
    pub fn order(&self) -> Vec<usize> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                PlanEntry::Document { index, .. } => Some(*index),
                PlanEntry::Padding { .. } => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Text(Vec<String>);

    impl Paginate for Text {
        fn line_count(&self) -> usize {
            self.0.len()
        }
    }

    impl TextLines for Text {
        fn lines(&self) -> &[String] {
            &self.0
        }
    }

    fn text(prefix: &str, n: usize) -> Text {
        Text((1..=n).map(|i| format!("{prefix}{i}")).collect())
    }

    #[test]
    fn test_build_three_documents() {
        let counts = [12usize, 3, 25];
        let layout = Layout::build(&counts, &[0, 1, 2], 10);

        let shape: Vec<(Option<usize>, usize)> = layout
            .segments()
            .iter()
            .map(|s| match s {
                Segment::Document { index, .. } => (Some(*index), s.line_count()),
                Segment::Padding(p) => (None, p.lines),
            })
            .collect();

        assert_eq!(
            shape,
            vec![
                (Some(0), 12),
                (None, 2),
                (Some(1), 3),
                (None, 2),
                (Some(2), 25),
                (None, 2),
            ]
        );
        assert_eq!(layout.whitespace_cost(), 0);
        assert_eq!(layout.separator_lines(), 6);
        assert_eq!(layout.total_lines(), 46);
        assert_eq!(layout.page_count(), 5);
    }

    #[test]
    fn test_build_inserts_page_aligned_pad() {
        // 8 lines leave 2 and the separator takes both, so the pad is empty.
        let counts = [8usize, 5];
        let layout = Layout::build(&counts, &[0, 1], 10);

        assert_eq!(layout.whitespace_cost(), 0);

        let counts = [7usize, 5];
        let layout = Layout::build(&counts, &[0, 1], 10);
        // 7 lines leave 3, separator 2, remaining 1 < 5.
        assert_eq!(layout.whitespace_cost(), 1);
        assert!(matches!(
            layout.segments()[2],
            Segment::Padding(Padding {
                lines: 1,
                kind: PadKind::PageAligned
            })
        ));
    }

    #[test]
    fn test_zero_length_pads_are_omitted() {
        let counts = [8usize, 5];
        let layout = Layout::build(&counts, &[0, 1], 10);
        assert!(layout.segments().iter().all(|s| s.line_count() > 0));
    }

    #[test]
    fn test_exact_multiple_gets_full_separator() {
        let counts = [20usize];
        let layout = Layout::build(&counts, &[0], 10);
        assert_eq!(layout.separator_lines(), 2);
    }

    #[test]
    fn test_render_preserves_lines() {
        let docs = vec![text("a", 2), text("b", 1)];
        let layout = Layout::build(&docs, &[1, 0], 10);
        assert_eq!(layout.render(), "b1\n\n\na1\na2\n\n\n");
    }

    #[test]
    fn test_plan_start_lines() {
        let counts = [7usize, 5];
        let plan = Layout::build(&counts, &[0, 1], 10).plan();

        assert_eq!(plan.order(), vec![0, 1]);
        assert_eq!(plan.whitespace_cost, 1);
        let starts: Vec<usize> = plan
            .entries
            .iter()
            .map(|e| match e {
                PlanEntry::Document { start_line, .. } | PlanEntry::Padding { start_line, .. } => {
                    *start_line
                }
            })
            .collect();
        assert_eq!(starts, vec![0, 7, 9, 10, 15]);
    }

    #[test]
    fn test_plan_serializes() {
        let counts = [3usize];
        let plan = Layout::build(&counts, &[0], 10).plan();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["pageCapacity"], 10);
        assert_eq!(json["entries"][0]["type"], "document");
        assert_eq!(json["entries"][1]["kind"], "separator");
    }

    #[test]
    fn test_empty_layout() {
        let layout: Layout<'_, usize> = Layout::empty(73);
        assert!(layout.is_empty());
        assert_eq!(layout.page_count(), 0);
        assert!(layout.order().is_empty());
    }
}
