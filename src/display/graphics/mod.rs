pub mod embedded_graphics_support;
pub mod framebuffer;
pub mod scaled;
