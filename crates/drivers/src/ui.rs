use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use font8x8::UnicodeFonts;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use tracing::{info, warn};
use voc_verifier_application::{
    ApplicationError, DispatchOutcome, Frame, ImageDecoder, Notice, Renderer, SessionCommand,
    SessionController,
};
use voc_verifier_domain::DecodedImage;

const CANVAS_MARGIN: usize = 16;
const HEADER_TOP: usize = 12;
const HEADER_HEIGHT: usize = 40;
const STATUS_TOP: usize = 62;
const WORKAREA_TOP: usize = 82;
const FOOTER_HEIGHT: usize = 52;
const GLYPH: usize = 8;
const LABEL_PAD: usize = 3;

const BACKGROUND: u32 = 0x1E1E22;
const HEADER_FILL: u32 = 0x000000;
const REVIEW_ACCENT: u32 = 0xF05C4B;
const TEXT: u32 = 0xFFFFFF;
const MUTED_TEXT: u32 = 0xB8B8C0;
const ERROR_TEXT: u32 = 0xFF7A6B;
const STAGE_FILL: u32 = 0x101010;
const STAGE_BORDER: u32 = 0x2D2D2D;
const BOX_COLOR: u32 = 0x0000FF;
const LABEL_FILL: u32 = 0xFF0000;

const INSTRUCTIONS: &str =
    "K keep | R remove | N next | P previous | V review removed | S save | Q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Command(SessionCommand),
    AskQuit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
struct PlacedImage {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
    scale: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PlacedBox {
    left: usize,
    top: usize,
    width: usize,
    height: usize,
    label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StageRect {
    left: usize,
    top: usize,
    width: usize,
    height: usize,
}

/// What the window shows; written by [`CanvasRenderer`], drawn by the loop.
#[derive(Debug)]
pub struct ReviewScreen {
    width: usize,
    height: usize,
    title: String,
    review_mode: bool,
    status: String,
    image: Option<PlacedImage>,
    boxes: Vec<PlacedBox>,
    message: Option<(String, Tone)>,
    prompt: Option<String>,
}

impl ReviewScreen {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            title: String::new(),
            review_mode: false,
            status: String::new(),
            image: None,
            boxes: Vec::new(),
            message: None,
            prompt: None,
        }
    }

    fn show_frame(&mut self, frame: &Frame, decoded: Option<&DecodedImage>) {
        let prefix = if frame.review_mode {
            "REVIEW MODE: "
        } else {
            ""
        };
        self.title = format!(
            "{prefix}{}: {}",
            frame.sample.subset(),
            frame.sample.file_name()
        );
        self.review_mode = frame.review_mode;
        self.status = frame.status.to_string();

        let stage = stage_rect(self.width, self.height);
        self.image = decoded.and_then(|image| fit_image(image, stage.width, stage.height));
        self.boxes = match &self.image {
            Some(placed) => place_boxes(frame, placed.scale),
            None => Vec::new(),
        };

        if let Some(error) = &frame.annotation_error {
            self.message = Some((error.clone(), Tone::Error));
        }
    }

    fn set_message(&mut self, text: impl Into<String>, tone: Tone) {
        self.message = Some((text.into(), tone));
    }

    fn set_prompt(&mut self, prompt: Option<String>) {
        self.prompt = prompt;
    }

    fn draw(&self, buffer: &mut [u32]) {
        let width = self.width;
        buffer.fill(BACKGROUND);

        let stage = stage_rect(self.width, self.height);
        fill_rect(buffer, width, stage.left, stage.top, stage.width, stage.height, STAGE_FILL);
        draw_rect(buffer, width, stage.left, stage.top, stage.width, stage.height, STAGE_BORDER);

        if let Some(image) = &self.image {
            let origin_x = stage.left + (stage.width.saturating_sub(image.width)) / 2;
            let origin_y = stage.top + (stage.height.saturating_sub(image.height)) / 2;
            for y in 0..image.height {
                for x in 0..image.width {
                    let color = image.pixels[y * image.width + x];
                    set_pixel(buffer, width, origin_x + x, origin_y + y, color);
                }
            }
            for placed in &self.boxes {
                draw_box(buffer, width, origin_x, origin_y, placed);
            }
        } else if !self.title.is_empty() {
            draw_text(
                buffer,
                width,
                stage.left + 16,
                stage.top + 16,
                "IMAGE UNAVAILABLE",
                ERROR_TEXT,
            );
        }

        self.draw_header(buffer);
        self.draw_footer(buffer);
    }

    fn draw_header(&self, buffer: &mut [u32]) {
        let width = self.width;
        let band_width = width.saturating_sub(CANVAS_MARGIN * 2);
        fill_rect(buffer, width, CANVAS_MARGIN, HEADER_TOP, band_width, HEADER_HEIGHT, HEADER_FILL);
        if self.review_mode {
            fill_rect(buffer, width, CANVAS_MARGIN, HEADER_TOP, 6, HEADER_HEIGHT, REVIEW_ACCENT);
        }
        draw_text(
            buffer,
            width,
            CANVAS_MARGIN + 14,
            HEADER_TOP + (HEADER_HEIGHT - GLYPH) / 2,
            &self.title,
            TEXT,
        );
        draw_text(buffer, width, CANVAS_MARGIN, STATUS_TOP, &self.status, TEXT);
    }

    fn draw_footer(&self, buffer: &mut [u32]) {
        let width = self.width;
        let top = self.height.saturating_sub(FOOTER_HEIGHT);
        draw_text(buffer, width, CANVAS_MARGIN, top + 8, INSTRUCTIONS, MUTED_TEXT);

        if let Some(prompt) = &self.prompt {
            draw_text(buffer, width, CANVAS_MARGIN, top + 28, prompt, REVIEW_ACCENT);
        } else if let Some((text, tone)) = &self.message {
            let color = match tone {
                Tone::Info => TEXT,
                Tone::Error => ERROR_TEXT,
            };
            draw_text(buffer, width, CANVAS_MARGIN, top + 28, text, color);
        }
    }
}

/// Renderer port backed by the shared [`ReviewScreen`].
pub struct CanvasRenderer {
    screen: Rc<RefCell<ReviewScreen>>,
    decoder: Box<dyn ImageDecoder>,
}

impl CanvasRenderer {
    pub fn new(screen: Rc<RefCell<ReviewScreen>>, decoder: Box<dyn ImageDecoder>) -> Self {
        Self { screen, decoder }
    }
}

impl Renderer for CanvasRenderer {
    fn render(&mut self, frame: &Frame) -> Result<(), ApplicationError> {
        match self.decoder.decode(&frame.image_path) {
            Ok(decoded) => {
                self.screen.borrow_mut().show_frame(frame, Some(&decoded));
                Ok(())
            }
            Err(error) => {
                let mut screen = self.screen.borrow_mut();
                screen.show_frame(frame, None);
                screen.set_message(format!("Failed to load image: {error}"), Tone::Error);
                Err(error)
            }
        }
    }

    fn notify(&mut self, notice: &Notice) {
        self.screen
            .borrow_mut()
            .set_message(notice.message(), Tone::Info);
    }
}

pub fn run_review_window(
    controller: &mut SessionController,
    screen: Rc<RefCell<ReviewScreen>>,
) -> Result<(), String> {
    let (width, height) = {
        let screen = screen.borrow();
        (screen.width, screen.height)
    };

    let mut window = Window::new(
        &format!("Annotation Verifier | {}", controller.layout().root().display()),
        width,
        height,
        WindowOptions::default(),
    )
    .map_err(|error| format!("failed to start UI window: {error}"))?;
    window.limit_update_rate(Some(Duration::from_micros(16_000)));

    let mut buffer = vec![BACKGROUND; width * height];
    let mut asking_quit = false;
    let mut finished = false;

    while window.is_open() && !finished {
        for key in window.get_keys_pressed(KeyRepeat::No) {
            if asking_quit {
                asking_quit = false;
                screen.borrow_mut().set_prompt(None);
                if confirms_quit(key) {
                    finished = dispatch(controller, &screen, SessionCommand::Quit);
                } else {
                    screen
                        .borrow_mut()
                        .set_message("Quit cancelled.", Tone::Info);
                }
                continue;
            }

            match key_action(key) {
                Some(KeyAction::Command(command)) => {
                    finished = dispatch(controller, &screen, command);
                }
                Some(KeyAction::AskQuit) => {
                    asking_quit = true;
                    screen.borrow_mut().set_prompt(Some(
                        "Save and quit? Y/Q/Enter to confirm, any other key to cancel".to_string(),
                    ));
                }
                None => {}
            }
            if finished {
                break;
            }
        }

        screen.borrow().draw(&mut buffer);
        window
            .update_with_buffer(&buffer, width, height)
            .map_err(|error| format!("failed to update UI window: {error}"))?;
    }

    if !finished {
        warn!("window closed without saving the session");
    }
    Ok(())
}

/// Returns true when the session is over.
fn dispatch(
    controller: &mut SessionController,
    screen: &Rc<RefCell<ReviewScreen>>,
    command: SessionCommand,
) -> bool {
    match controller.dispatch(command) {
        Ok(DispatchOutcome::Quit) => {
            info!("session saved, quitting");
            true
        }
        Ok(DispatchOutcome::Continue) => false,
        Err(error) if error.ends_session() => {
            info!(%error, "nothing left to review");
            if let Err(save_error) = controller.save_snapshot() {
                warn!(%save_error, "could not save the finished session");
            }
            true
        }
        Err(error) => {
            warn!(?command, %error, "command failed");
            screen
                .borrow_mut()
                .set_message(error.to_string(), Tone::Error);
            false
        }
    }
}

fn key_action(key: Key) -> Option<KeyAction> {
    let command = match key {
        Key::K => SessionCommand::Keep,
        Key::R => SessionCommand::Remove,
        Key::N | Key::Right => SessionCommand::Next,
        Key::P | Key::Left => SessionCommand::Previous,
        Key::V => SessionCommand::ToggleReview,
        Key::S => SessionCommand::Save,
        Key::Q | Key::Escape => return Some(KeyAction::AskQuit),
        _ => return None,
    };
    Some(KeyAction::Command(command))
}

fn confirms_quit(key: Key) -> bool {
    matches!(key, Key::Y | Key::Q | Key::Enter)
}

fn stage_rect(width: usize, height: usize) -> StageRect {
    let bottom = height.saturating_sub(FOOTER_HEIGHT + 4);
    StageRect {
        left: CANVAS_MARGIN,
        top: WORKAREA_TOP,
        width: width.saturating_sub(CANVAS_MARGIN * 2),
        height: bottom.saturating_sub(WORKAREA_TOP),
    }
}

/// Scales the image to fit the stage, keeping its aspect ratio.
fn fit_image(image: &DecodedImage, max_width: usize, max_height: usize) -> Option<PlacedImage> {
    let src_width = image.width as usize;
    let src_height = image.height as usize;
    let max_width = max_width.saturating_sub(2);
    let max_height = max_height.saturating_sub(2);
    if src_width == 0 || src_height == 0 || max_width == 0 || max_height == 0 {
        return None;
    }

    let scale = (max_width as f32 / src_width as f32).min(max_height as f32 / src_height as f32);
    let dst_width = ((src_width as f32 * scale).round() as usize).clamp(1, max_width);
    let dst_height = ((src_height as f32 * scale).round() as usize).clamp(1, max_height);

    let mut pixels = vec![0_u32; dst_width * dst_height];
    for y in 0..dst_height {
        let src_y = (y * src_height / dst_height).min(src_height - 1);
        for x in 0..dst_width {
            let src_x = (x * src_width / dst_width).min(src_width - 1);
            pixels[y * dst_width + x] = image.pixel(src_x as u32, src_y as u32).unwrap_or(0);
        }
    }

    Some(PlacedImage {
        width: dst_width,
        height: dst_height,
        pixels,
        scale,
    })
}

fn place_boxes(frame: &Frame, scale: f32) -> Vec<PlacedBox> {
    let to_screen = |value: i64| (value.max(0) as f32 * scale).round() as usize;
    frame
        .annotation
        .objects
        .iter()
        .map(|object| PlacedBox {
            left: to_screen(object.xmin),
            top: to_screen(object.ymin),
            width: to_screen(object.xmin.saturating_add(object.width()))
                .saturating_sub(to_screen(object.xmin)),
            height: to_screen(object.ymin.saturating_add(object.height()))
                .saturating_sub(to_screen(object.ymin)),
            label: object.label.clone(),
        })
        .collect()
}

fn draw_box(
    buffer: &mut [u32],
    width: usize,
    origin_x: usize,
    origin_y: usize,
    placed: &PlacedBox,
) {
    let left = origin_x.saturating_add(placed.left);
    let top = origin_y.saturating_add(placed.top);
    draw_rect(buffer, width, left, top, placed.width, placed.height, BOX_COLOR);
    draw_rect(
        buffer,
        width,
        left.saturating_add(1),
        top.saturating_add(1),
        placed.width.saturating_sub(2),
        placed.height.saturating_sub(2),
        BOX_COLOR,
    );

    let label_width = placed.label.chars().count().saturating_mul(GLYPH) + LABEL_PAD * 2;
    let label_height = GLYPH + LABEL_PAD * 2;
    let label_top = top.saturating_sub(label_height);
    fill_rect(buffer, width, left, label_top, label_width, label_height, LABEL_FILL);
    draw_text(
        buffer,
        width,
        left.saturating_add(LABEL_PAD),
        label_top + LABEL_PAD,
        &placed.label,
        TEXT,
    );
}

fn fill_rect(
    buffer: &mut [u32],
    width: usize,
    left: usize,
    top: usize,
    w: usize,
    h: usize,
    color: u32,
) {
    let height = buffer.len() / width;
    for y in top..top.saturating_add(h).min(height) {
        for x in left..left.saturating_add(w).min(width) {
            set_pixel(buffer, width, x, y, color);
        }
    }
}

fn draw_rect(
    buffer: &mut [u32],
    width: usize,
    left: usize,
    top: usize,
    w: usize,
    h: usize,
    color: u32,
) {
    if w == 0 || h == 0 {
        return;
    }
    let height = buffer.len() / width;
    let right = left.saturating_add(w - 1);
    let bottom = top.saturating_add(h - 1);
    for x in left..=right.min(width.saturating_sub(1)) {
        set_pixel(buffer, width, x, top, color);
        set_pixel(buffer, width, x, bottom, color);
    }
    for y in top..=bottom.min(height.saturating_sub(1)) {
        set_pixel(buffer, width, left, y, color);
        set_pixel(buffer, width, right, y, color);
    }
}

fn set_pixel(buffer: &mut [u32], width: usize, x: usize, y: usize, color: u32) {
    let height = buffer.len() / width;
    if x < width && y < height {
        buffer[y * width + x] = color;
    }
}

fn draw_text(buffer: &mut [u32], width: usize, x: usize, y: usize, text: &str, color: u32) {
    let mut cursor_x = x;
    for ch in text.chars() {
        if ch == '\n' {
            continue;
        }
        if cursor_x >= width {
            break;
        }
        draw_char(buffer, width, cursor_x, y, ch, color);
        cursor_x = cursor_x.saturating_add(GLYPH);
    }
}

fn draw_char(buffer: &mut [u32], width: usize, x: usize, y: usize, ch: char, color: u32) {
    let glyph = font8x8::BASIC_FONTS.get(ch).unwrap_or([0; 8]);
    for (row, bits) in glyph.iter().enumerate() {
        for col in 0..GLYPH {
            if (bits >> col) & 1 == 1 {
                set_pixel(buffer, width, x + col, y.saturating_add(row), color);
            }
        }
    }
}
