// Thin wrappers over the browser console.

pub fn info(message: &str) {
    web_sys::console::log_1(&message.into());
}

pub fn warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

pub fn error(message: &str) {
    web_sys::console::error_1(&message.into());
}
