pub mod hexbin;

mod axes_draw;
