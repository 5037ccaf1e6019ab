use crate::config::COMBINED_CSS;
use crate::manifest::{FamilyMapping, FontCoverage};
use crate::style::{StyleVariant, BASE_CLASS, FAMILIES};
use std::collections::BTreeMap;

/// Render `demo.html`, a searchable gallery of every icon.
///
/// The page links the combined stylesheet, so it has to sit next to it in
/// the output directory. Each card starts in the first style whose font
/// carries the icon.
pub fn render_demo(mappings: &[FamilyMapping], coverage: &FontCoverage) -> String {
    // name -> every variant that can show it, plus the fallback style
    let mut icons: BTreeMap<&str, (Vec<StyleVariant>, StyleVariant)> = BTreeMap::new();
    for mapping in mappings {
        let first = mapping.family.variants[0];
        for (name, codepoint) in mapping.codepoints.iter() {
            let (styles, _) = icons.entry(name).or_insert_with(|| (Vec::new(), first));
            styles.extend(coverage.styles(mapping.family, codepoint));
        }
    }

    let mut cards_html = String::new();
    for (name, (styles, fallback)) in &icons {
        let name = escape_html(name);
        let shown = styles.first().unwrap_or(fallback).css_prefix();
        let styles: Vec<&str> = styles.iter().map(|v| v.css_prefix()).collect();
        cards_html.push_str(&format!(
            r#"
        <div class="icon-card" data-name="{name}" data-styles="{styles}">
            <i class="{shown} {BASE_CLASS}-{name}"></i>
            <div class="icon-name">{name}</div>
        </div>"#,
            styles = styles.join(" "),
        ));
    }

    let mut options_html = String::new();
    for family in &FAMILIES {
        for variant in family.variants {
            options_html.push_str(&format!(
                r#"
                    <option value="{prefix}">{label}</option>"#,
                prefix = variant.css_prefix(),
                label = variant.label(),
            ));
        }
    }

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>SAXI Icons - Demo</title>
    <link rel="stylesheet" href="{COMBINED_CSS}">
    <style>
        * {{
            box-sizing: border-box;
            margin: 0;
            padding: 0;
        }}

        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #f7f7f8;
            color: #222;
            min-height: 100vh;
        }}

        .header {{
            background: #fff;
            border-bottom: 1px solid #e4e4e7;
            padding: 1.5rem 2rem;
            position: sticky;
            top: 0;
            z-index: 100;
        }}

        .header-content {{
            max-width: 1400px;
            margin: 0 auto;
            display: flex;
            justify-content: space-between;
            align-items: center;
            gap: 1rem;
            flex-wrap: wrap;
        }}

        h1 {{
            font-size: 1.5rem;
            font-weight: 600;
        }}

        .stats {{
            color: #777;
            font-size: 0.875rem;
        }}

        .controls {{
            display: flex;
            gap: 1rem;
            align-items: center;
            flex-wrap: wrap;
        }}

        .search-box, .style-select {{
            background: #fff;
            border: 1px solid #d4d4d8;
            border-radius: 8px;
            padding: 0.5rem 1rem;
            font-size: 0.875rem;
        }}

        .search-box {{
            width: 220px;
        }}

        .size-control {{
            display: flex;
            align-items: center;
            gap: 0.5rem;
            font-size: 0.875rem;
            color: #777;
        }}

        .container {{
            max-width: 1400px;
            margin: 0 auto;
            padding: 2rem;
        }}

        .grid {{
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(140px, 1fr));
            gap: 1rem;
        }}

        .icon-card {{
            background: #fff;
            border: 1px solid #e4e4e7;
            border-radius: 12px;
            padding: 1.25rem;
            text-align: center;
            cursor: pointer;
            transition: all 0.2s ease;
        }}

        .icon-card:hover {{
            border-color: #a1a1aa;
            transform: translateY(-2px);
        }}

        .icon-card.hidden {{
            display: none;
        }}

        .icon-card.unavailable {{
            opacity: 0.3;
        }}

        .icon-card i {{
            display: block;
            font-size: var(--icon-size, 32px);
            margin-bottom: 0.75rem;
        }}

        .icon-name {{
            font-size: 0.75rem;
            color: #666;
            word-break: break-word;
        }}

        .toast {{
            position: fixed;
            bottom: 2rem;
            left: 50%;
            transform: translateX(-50%) translateY(100px);
            background: #222;
            color: #fff;
            padding: 0.75rem 1.5rem;
            border-radius: 8px;
            font-size: 0.875rem;
            opacity: 0;
            transition: all 0.3s ease;
            z-index: 1000;
        }}

        .toast.show {{
            transform: translateX(-50%) translateY(0);
            opacity: 1;
        }}

        .no-results {{
            grid-column: 1 / -1;
            text-align: center;
            padding: 3rem;
            color: #999;
        }}
    </style>
</head>
<body>
    <header class="header">
        <div class="header-content">
            <div>
                <h1>SAXI Icons</h1>
                <p class="stats">{icon_count} icons</p>
            </div>
            <div class="controls">
                <input type="text" class="search-box" placeholder="Search icons..." id="search">
                <select class="style-select" id="style">{options_html}
                </select>
                <div class="size-control">
                    <label for="size">Size:</label>
                    <input type="range" id="size" min="16" max="96" value="32">
                    <span id="size-value">32px</span>
                </div>
            </div>
        </div>
    </header>

    <main class="container">
        <div class="grid" id="grid">
            {cards_html}
        </div>
    </main>

    <div class="toast" id="toast">Copied!</div>

    <script>
        const grid = document.getElementById('grid');
        const search = document.getElementById('search');
        const styleSelect = document.getElementById('style');
        const sizeSlider = document.getElementById('size');
        const sizeValue = document.getElementById('size-value');
        const toast = document.getElementById('toast');

        search.addEventListener('input', (e) => {{
            const query = e.target.value.toLowerCase();
            document.querySelectorAll('.icon-card').forEach(card => {{
                card.classList.toggle('hidden', !card.dataset.name.toLowerCase().includes(query));
            }});

            const visible = document.querySelectorAll('.icon-card:not(.hidden)').length;
            const noResults = document.querySelector('.no-results');
            if (visible === 0 && !noResults) {{
                grid.insertAdjacentHTML('beforeend', '<div class="no-results">No icons found</div>');
            }} else if (visible > 0 && noResults) {{
                noResults.remove();
            }}
        }});

        styleSelect.addEventListener('change', (e) => {{
            const style = e.target.value;
            document.querySelectorAll('.icon-card').forEach(card => {{
                const icon = card.querySelector('i');
                icon.className = `${{style}} {BASE_CLASS}-${{card.dataset.name}}`;
                card.classList.toggle('unavailable', !card.dataset.styles.split(' ').includes(style));
            }});
        }});

        sizeSlider.addEventListener('input', (e) => {{
            const size = e.target.value;
            document.documentElement.style.setProperty('--icon-size', size + 'px');
            sizeValue.textContent = size + 'px';
        }});

        grid.addEventListener('click', (e) => {{
            const card = e.target.closest('.icon-card');
            if (!card) return;

            const text = card.querySelector('i').className;
            navigator.clipboard.writeText(text).then(() => {{
                toast.textContent = `Copied ${{text}}`;
                toast.classList.add('show');
                setTimeout(() => toast.classList.remove('show'), 2000);
            }});
        }});
    </script>
</body>
</html>"##,
        icon_count = icons.len(),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
