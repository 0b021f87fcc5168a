//! The scrollable landing page drawn over the backdrop.

use orbita_background::color::mix;
use orbita_core::{Rgba, palette};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::Widget,
};

use crate::reveal::{RevealTracker, Revealable};
use crate::ticker::PriceTicker;

/// Below this opacity a line is not drawn at all.
const MIN_OPACITY: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Title,
    Accent,
    Body,
    Muted,
}

impl Tone {
    fn color(self) -> Rgba {
        match self {
            Self::Title => palette::WHITE,
            Self::Accent => Rgba::rgb(0xb7, 0xa6, 0xff),
            Self::Body => Rgba::rgb(0xd4, 0xd4, 0xd8),
            Self::Muted => Rgba::rgb(0x71, 0x71, 0x7a),
        }
    }

    fn modifier(self) -> Modifier {
        match self {
            Self::Title => Modifier::BOLD,
            _ => Modifier::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(&'static str, Tone),
    /// The live price label.
    Price,
    /// "updated at" line under the price.
    Updated,
    Blank,
}

/// One row of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLine {
    pub content: Content,
    /// `(block, child)` this row animates with, if any.
    pub reveal: Option<(usize, usize)>,
}

/// A navigation target.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub label: &'static str,
    pub row: usize,
}

struct Card {
    title: &'static str,
    body: [&'static str; 2],
}

const FEATURES: [Card; 3] = [
    Card {
        title: "Instant swaps",
        body: [
            "Route any pair through the deepest pools",
            "and settle in a single transaction.",
        ],
    },
    Card {
        title: "Deep liquidity",
        body: [
            "Aggregated books across every major chain,",
            "from BTC and ETH to the smallest memecoins.",
        ],
    },
    Card {
        title: "Self-custody",
        body: [
            "Your keys never leave your wallet.",
            "No accounts, no deposits, no waiting.",
        ],
    },
];

/// Static page content with its layout and reveal blocks.
#[derive(Debug, Clone)]
pub struct Page {
    lines: Vec<PageLine>,
    anchors: Vec<Anchor>,
    targets: Vec<Revealable>,
}

impl Page {
    pub fn lines(&self) -> &[PageLine] {
        &self.lines
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn targets(&self) -> &[Revealable] {
        &self.targets
    }

    /// Largest scroll offset for a viewport of `rows` rows.
    pub fn max_scroll(&self, rows: usize) -> usize {
        self.height().saturating_sub(rows)
    }

    /// The built-in landing page.
    pub fn landing() -> Self {
        let mut b = PageBuilder::default();

        b.blanks(5);
        b.text("O R B I T A", Tone::Title);
        b.blank();
        b.text("Swap tokens at escape velocity.", Tone::Body);
        b.text("Every chain, one orbit.", Tone::Muted);
        b.blanks(6);
        b.text("scroll ↓", Tone::Muted);
        b.blanks(4);

        b.anchor("Features");
        b.text("Features", Tone::Title);
        b.blank();
        let group = b.begin_block(FEATURES.len());
        for (child, card) in FEATURES.iter().enumerate() {
            b.revealed(group, child, Content::Text(card.title, Tone::Accent));
            for line in card.body {
                b.revealed(group, child, Content::Text(line, Tone::Body));
            }
            b.revealed(group, child, Content::Blank);
        }
        b.end_block(group);
        b.blanks(4);

        b.anchor("DEX");
        let dex = b.begin_block(0);
        b.revealed(dex, 0, Content::Text("DEX preview", Tone::Title));
        b.revealed(dex, 0, Content::Blank);
        b.revealed(dex, 0, Content::Text("SOL / USDC", Tone::Accent));
        b.revealed(dex, 0, Content::Price);
        b.revealed(dex, 0, Content::Updated);
        b.end_block(dex);
        b.blanks(6);

        b.anchor("Community");
        b.text("Community", Tone::Title);
        b.blank();
        b.text("Join the crew aboard the mothership.", Tone::Body);
        b.text("Built by stargazers, for stargazers.", Tone::Muted);
        b.blanks(8);

        b.build()
    }
}

#[derive(Default)]
struct PageBuilder {
    lines: Vec<PageLine>,
    anchors: Vec<Anchor>,
    targets: Vec<Revealable>,
}

impl PageBuilder {
    fn push(&mut self, content: Content, reveal: Option<(usize, usize)>) {
        self.lines.push(PageLine { content, reveal });
    }

    fn text(&mut self, text: &'static str, tone: Tone) {
        self.push(Content::Text(text, tone), None);
    }

    fn blank(&mut self) {
        self.push(Content::Blank, None);
    }

    fn blanks(&mut self, n: usize) {
        for _ in 0..n {
            self.blank();
        }
    }

    fn anchor(&mut self, label: &'static str) {
        self.anchors.push(Anchor {
            label,
            row: self.lines.len(),
        });
    }

    fn begin_block(&mut self, children: usize) -> usize {
        self.targets.push(Revealable {
            top: self.lines.len() as f64,
            height: 0.0,
            children,
        });
        self.targets.len() - 1
    }

    fn revealed(&mut self, block: usize, child: usize, content: Content) {
        self.push(content, Some((block, child)));
    }

    fn end_block(&mut self, block: usize) {
        let target = &mut self.targets[block];
        target.height = self.lines.len() as f64 - target.top;
    }

    fn build(self) -> Page {
        Page {
            lines: self.lines,
            anchors: self.anchors,
            targets: self.targets,
        }
    }
}

/// Renders the visible slice of a [`Page`].
pub struct PageView<'a> {
    pub page: &'a Page,
    pub tracker: &'a RevealTracker,
    pub ticker: Option<&'a PriceTicker>,
    /// Static price shown when there is no ticker.
    pub fallback_price: f64,
    pub scroll: usize,
    pub now_ms: u64,
    /// Rows a fully displaced line is pushed down.
    pub reveal_rows: f64,
}

impl PageView<'_> {
    fn line(&self, content: &Content, opacity: f64) -> Option<Line<'static>> {
        let styled = |tone: Tone, color: Rgba| {
            Style::new()
                .fg(mix(palette::BACKGROUND, color, opacity))
                .add_modifier(tone.modifier())
        };
        match content {
            Content::Blank => None,
            Content::Text(text, tone) => {
                Some(Line::styled(*text, styled(*tone, tone.color())).centered())
            }
            Content::Price => {
                let (text, color) = match self.ticker {
                    Some(ticker) => (ticker.text(), ticker.trend(self.now_ms).color()),
                    None => (format!("${:.2}", self.fallback_price), palette::NEUTRAL),
                };
                Some(Line::styled(text, styled(Tone::Title, color)).centered())
            }
            Content::Updated => {
                let at = self.ticker.and_then(PriceTicker::updated_at)?;
                let text = format!("updated {}", at.format("%H:%M:%S"));
                Some(Line::styled(text, styled(Tone::Muted, Tone::Muted.color())).centered())
            }
        }
    }
}

impl Widget for PageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let first = self.scroll;
        let last = self.scroll + area.height as usize;
        // Displaced lines sit below their row, so look a little above the top.
        let lookback = self.reveal_rows.ceil() as usize;

        for (row, line) in self
            .page
            .lines()
            .iter()
            .enumerate()
            .take(last)
            .skip(first.saturating_sub(lookback))
        {
            let style = match line.reveal {
                Some((block, child)) => self.tracker.style(block, child, self.now_ms),
                None => crate::reveal::RevealStyle::SHOWN,
            };
            if style.opacity < MIN_OPACITY {
                continue;
            }
            let shift = (style.shift * self.reveal_rows).round() as usize;
            let Some(y) = (row + shift).checked_sub(first) else {
                continue;
            };
            if y >= area.height as usize {
                continue;
            }
            let Some(text) = self.line(&line.content, style.opacity) else {
                continue;
            };
            let line_area = Rect::new(area.x, area.y + y as u16, area.width, 1);
            text.render(line_area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveal::RevealParams;
    use orbita_config::TickerConfig;
    use rand::{SeedableRng, rngs::StdRng};

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    fn view<'a>(
        page: &'a Page,
        tracker: &'a RevealTracker,
        ticker: Option<&'a PriceTicker>,
        scroll: usize,
        now_ms: u64,
    ) -> PageView<'a> {
        PageView {
            page,
            tracker,
            ticker,
            fallback_price: 142.5,
            scroll,
            now_ms,
            reveal_rows: 2.0,
        }
    }

    #[test]
    fn test_landing_layout() {
        let page = Page::landing();
        let labels: Vec<&str> = page.anchors().iter().map(|a| a.label).collect();
        assert_eq!(labels, ["Features", "DEX", "Community"]);
        assert_eq!(page.targets().len(), 2);
        assert_eq!(page.targets()[0].children, 3);
        assert_eq!(page.targets()[1].children, 0);

        // Every revealed line falls inside its block.
        for (row, line) in page.lines().iter().enumerate() {
            if let Some((block, _)) = line.reveal {
                let t = page.targets()[block];
                assert!(row as f64 >= t.top && (row as f64) < t.top + t.height);
            }
        }
        assert!(page.lines().iter().any(|l| l.content == Content::Price));
    }

    #[test]
    fn test_hidden_blocks_are_not_drawn() {
        let page = Page::landing();
        let tracker = RevealTracker::new(RevealParams::default(), page.targets().to_vec());
        let scroll = page.anchors()[1].row;
        let mut buf = Buffer::empty(Rect::new(0, 0, 60, 10));
        view(&page, &tracker, None, scroll, 0).render(buf.area, &mut buf);
        assert!(!buffer_text(&buf).contains("DEX preview"));
    }

    #[test]
    fn test_revealed_block_shows_price() {
        let page = Page::landing();
        let mut tracker = RevealTracker::new(RevealParams::default(), page.targets().to_vec());
        let scroll = page.anchors()[1].row;
        tracker.observe(scroll as f64, 10.0, 0);

        let mut ticker = PriceTicker::new(&TickerConfig::default());
        ticker.tick(0, &mut StdRng::seed_from_u64(3));

        let mut buf = Buffer::empty(Rect::new(0, 0, 60, 10));
        view(&page, &tracker, Some(&ticker), scroll, 5000).render(buf.area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("DEX preview"));
        assert!(text.contains(&ticker.text()));
        assert!(text.contains("updated"));
    }

    #[test]
    fn test_fallback_price_without_ticker() {
        let page = Page::landing();
        let mut tracker = RevealTracker::new(RevealParams::default(), page.targets().to_vec());
        let scroll = page.anchors()[1].row;
        tracker.observe(scroll as f64, 10.0, 0);

        let mut buf = Buffer::empty(Rect::new(0, 0, 60, 10));
        view(&page, &tracker, None, scroll, 5000).render(buf.area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("$142.50"));
        assert!(!text.contains("updated"));
    }

    #[test]
    fn test_max_scroll() {
        let page = Page::landing();
        assert_eq!(page.max_scroll(page.height() + 5), 0);
        assert_eq!(page.max_scroll(10), page.height() - 10);
    }
}
