pub mod apply_filter_use_case;
pub mod input_router;
pub mod overlay_image_use_case;
