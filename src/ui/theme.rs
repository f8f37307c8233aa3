//! Shared style helpers for consistent styling across pages.

// ============================================
// BUTTON STYLES
// ============================================

pub fn btn_primary() -> &'static str {
    "rounded-lg bg-indigo-500 px-4 py-2 text-sm font-semibold text-white hover:bg-indigo-400"
}

pub fn btn_secondary() -> &'static str {
    "rounded-lg border border-slate-600 px-4 py-2 text-sm font-semibold text-slate-200 hover:bg-slate-800"
}

pub fn btn_ghost() -> &'static str {
    "rounded-lg border border-slate-700 px-4 py-2 text-sm text-slate-400 transition hover:border-slate-600 hover:text-slate-200"
}

pub fn btn_small_active() -> &'static str {
    "rounded px-2 py-1 text-xs font-semibold bg-indigo-500/20 text-indigo-300 border border-indigo-500/40"
}

pub fn btn_small_inactive() -> &'static str {
    "rounded px-2 py-1 text-xs text-slate-500 border border-slate-700 hover:border-slate-600 hover:text-slate-300"
}

// ============================================
// INPUT STYLES
// ============================================

pub fn input_class() -> &'static str {
    "rounded-lg border border-slate-700 bg-slate-950 px-4 py-2.5 text-sm text-slate-100 focus:border-indigo-500 focus:outline-none"
}

pub fn input_small() -> &'static str {
    "rounded-lg border border-slate-700 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:border-indigo-500 focus:outline-none"
}

// ============================================
// PANEL / CONTAINER STYLES
// ============================================

pub fn panel_border() -> &'static str {
    "rounded-xl border border-slate-800 bg-slate-900/40"
}

pub fn panel_solid() -> &'static str {
    "rounded-xl border border-slate-800 bg-slate-900/60"
}

// ============================================
// TEXT STYLES
// ============================================

pub fn text_muted() -> &'static str {
    "text-slate-500"
}

pub fn label_class() -> &'static str {
    "block text-xs font-semibold uppercase text-slate-500"
}

pub fn link_class() -> &'static str {
    "text-xs font-semibold uppercase tracking-wide text-indigo-300 hover:text-indigo-100"
}

pub fn section_title() -> &'static str {
    "text-sm font-semibold uppercase tracking-wide text-slate-500"
}

// ============================================
// CONDITION SCORE STYLES
// ============================================

pub fn score_text_class(score: u8) -> &'static str {
    match score {
        90..=100 => "text-emerald-300",
        75..=89 => "text-lime-300",
        50..=74 => "text-amber-300",
        25..=49 => "text-orange-300",
        _ => "text-rose-300",
    }
}

/// Maps a 0-100 score onto the `score-0`..`score-5` dial bands from main.css.
pub fn score_circle_class(score: u8) -> &'static str {
    match score.min(100) / 20 {
        5 => "score-circle score-5",
        4 => "score-circle score-4",
        3 => "score-circle score-3",
        2 => "score-circle score-2",
        1 => "score-circle score-1",
        _ => "score-circle score-0",
    }
}
