//! Built-in style sheet for rendered diagrams.
//!
//! The renderer only emits structure and class names (`terminal`,
//! `non-terminal`, `comment`, `label`, `group-box`, `group-label`); all
//! colors and fonts come from CSS.

/// Style sheet used when no custom one is configured.
pub const DEFAULT_STYLE: &str = r#"svg.railroad-diagram {
    background-color: hsl(30, 20%, 95%);
}
svg.railroad-diagram path {
    stroke-width: 3;
    stroke: black;
    fill: rgba(0, 0, 0, 0);
}
svg.railroad-diagram text {
    font: bold 14px monospace;
    text-anchor: middle;
}
svg.railroad-diagram text.label,
svg.railroad-diagram text.group-label {
    text-anchor: start;
}
svg.railroad-diagram text.comment,
svg.railroad-diagram text.group-label {
    font: italic 12px monospace;
}
svg.railroad-diagram g.terminal rect,
svg.railroad-diagram g.non-terminal rect {
    stroke-width: 3;
    stroke: black;
    fill: hsl(120, 100%, 90%);
}
svg.railroad-diagram g.non-terminal rect {
    fill: hsl(200, 80%, 90%);
}
svg.railroad-diagram a:hover rect {
    fill: hsl(50, 100%, 85%);
}
svg.railroad-diagram rect.group-box {
    stroke: gray;
    stroke-dasharray: 10 5;
    fill: none;
}
"#;
