pub mod css_output;
pub mod owned_css;
