pub mod use_focus_trap;
