//! Built-in level catalog: twelve concepts, four per difficulty tier.

use crate::model::{Difficulty, Level, LevelDraft};

struct Entry {
    id: u64,
    difficulty: Difficulty,
    title: &'static str,
    concept: &'static str,
    examples: &'static [&'static str],
    target_markup: &'static str,
    hint: &'static str,
}

impl Entry {
    fn draft(&self) -> LevelDraft {
        LevelDraft {
            id: self.id,
            difficulty: self.difficulty,
            title: self.title.to_string(),
            concept: self.concept.to_string(),
            examples: self.examples.iter().map(|e| (*e).to_string()).collect(),
            target_markup: self.target_markup.to_string(),
            hint: self.hint.to_string(),
        }
    }
}

const ENTRIES: [Entry; 12] = [
    // JUNIOR
    Entry {
        id: 1,
        difficulty: Difficulty::Junior,
        title: "Basic Tag",
        concept: "Tag Name",
        examples: &["div", "h1", "p", "section"],
        target_markup: "<div></div>",
        hint: "Just type 'div'.",
    },
    Entry {
        id: 2,
        difficulty: Difficulty::Junior,
        title: "Classes",
        concept: ".className",
        examples: &["div.box", "span.text-red", "p.intro"],
        target_markup: r#"<div class="container"></div>"#,
        hint: "element.class",
    },
    Entry {
        id: 3,
        difficulty: Difficulty::Junior,
        title: "IDs",
        concept: "#idName",
        examples: &["div#main", "section#hero", "h1#title"],
        target_markup: r#"<section id="hero"></section>"#,
        hint: "element#id",
    },
    Entry {
        id: 4,
        difficulty: Difficulty::Junior,
        title: "Children",
        concept: "> (Child)",
        examples: &["div>p", "ul>li", "nav>a"],
        target_markup: "<nav>\n  <ul></ul>\n</nav>",
        hint: "parent>child",
    },
    // PLENO
    Entry {
        id: 5,
        difficulty: Difficulty::Pleno,
        title: "Siblings",
        concept: "+ (Sibling)",
        examples: &["h1+p", "div+footer", "a+a"],
        target_markup: "<h1></h1>\n<p></p>",
        hint: "element+element",
    },
    Entry {
        id: 6,
        difficulty: Difficulty::Pleno,
        title: "Multiplication",
        concept: "* (Multiply)",
        examples: &["li*3", "div*2", "p*5"],
        target_markup: "<ul>\n  <li></li>\n  <li></li>\n  <li></li>\n</ul>",
        hint: "element*number",
    },
    Entry {
        id: 7,
        difficulty: Difficulty::Pleno,
        title: "Grouping",
        concept: "() (Group)",
        examples: &["div>(header>h1)+main", "(div>dl)+(div>dl)"],
        target_markup: "<div>\n  <header>\n    <h1></h1>\n  </header>\n  <footer></footer>\n</div>",
        hint: "div>(header>h1)+footer",
    },
    Entry {
        id: 8,
        difficulty: Difficulty::Pleno,
        title: "Attributes",
        concept: "[attr=value]",
        examples: &["a[href='url']", "input[type='text']", "td[colspan=2]"],
        target_markup: r##"<a href="#"></a>"##,
        hint: "a[href='#']",
    },
    // SENIOR
    Entry {
        id: 9,
        difficulty: Difficulty::Senior,
        title: "Text Content",
        concept: "{Text}",
        examples: &["p{Hello World}", "a{Click me}", "li{Item}"],
        target_markup: "<h1>Welcome</h1>",
        hint: "h1{Title}",
    },
    Entry {
        id: 10,
        difficulty: Difficulty::Senior,
        title: "Item Numbering",
        concept: "$ (Numbering)",
        examples: &["li.item$*3", "h$*3", "img[src=image$.jpg]*2"],
        target_markup: "<ul>\n  <li class=\"item1\"></li>\n  <li class=\"item2\"></li>\n  <li class=\"item3\"></li>\n</ul>",
        hint: "ul>li.item$*3",
    },
    Entry {
        id: 11,
        difficulty: Difficulty::Senior,
        title: "Implicit Tags",
        concept: "Context-aware",
        examples: &[".class (div)", "em>.class (span)", "ul>.item (li)"],
        target_markup: "<table>\n  <tr class=\"row\">\n    <td class=\"col\"></td>\n  </tr>\n</table>",
        hint: "table>.row>.col",
    },
    Entry {
        id: 12,
        difficulty: Difficulty::Senior,
        title: "The Architect",
        concept: "Full Complex Syntax",
        examples: &["#page>(header>h1{Logo})+main#content+footer"],
        target_markup: "<div class=\"card\">\n  <div class=\"card-header\">\n    <h3 class=\"title\">Product 1</h3>\n  </div>\n  <div class=\"card-body\">\n    <p>Description</p>\n    <button class=\"btn-primary\">Buy</button>\n  </div>\n</div>",
        hint: "Combine classes, ids, multiply, content and grouping.",
    },
];

/// Number of levels in the built-in catalog.
pub const CATALOG_SIZE: usize = ENTRIES.len();

/// Every level, in teaching order (ids strictly increasing, tiers non-decreasing).
#[must_use]
pub fn all_levels() -> Vec<Level> {
    ENTRIES.iter().map(|entry| entry.draft().into_level()).collect()
}
