use anyhow::{Context, Result};
use light_status_geometry::{Alignment, Rect};
use light_status_text::StatusLine;
use tokio::io::AsyncBufRead;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::surface::Surface;

/// 渲染循环状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// 等待下一行
    Idle,
    /// 正在测量、对齐并绘制一行
    Rendering,
    /// 已结束，不会再绘制
    Terminated,
}

/// 循环结束的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// 生产者关闭了输出流
    EndOfStream,
    /// 收到终止信号
    Cancelled,
}

/// 每读到一行就重绘一次面板
pub struct RenderLoop<S> {
    surface: S,
    panel: Rect,
    text_alignment: Alignment,
    line: StatusLine,
    state: LoopState,
    frames: u64,
}

impl<S: Surface> RenderLoop<S> {
    /// `panel` 只使用宽高，文本位置相对面板左上角
    pub fn new(surface: S, panel: Rect, text_alignment: Alignment, max_status_len: usize) -> Self {
        Self {
            surface,
            panel,
            text_alignment,
            line: StatusLine::with_capacity(max_status_len),
            state: LoopState::Idle,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// 已绘制的帧数
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// 阻塞读取直到流结束或被取消
    pub async fn run<R>(&mut self, reader: &mut R, cancel: &CancellationToken) -> Result<Termination>
    where
        R: AsyncBufRead + Unpin,
    {
        let termination = loop {
            let read = tokio::select! {
                _ = cancel.cancelled() => break Termination::Cancelled,
                read = self.line.read_from(reader) => read.context("failed to read status line")?,
            };
            if read == 0 {
                break Termination::EndOfStream;
            }

            self.state = LoopState::Rendering;
            self.render_line()?;
            self.state = LoopState::Idle;
        };

        self.state = LoopState::Terminated;
        info!(frames = self.frames, ?termination, "render loop finished");
        Ok(termination)
    }

    /// 绘制缓冲区中的当前行
    fn render_line(&mut self) -> Result<()> {
        self.line.normalize();
        let text = self.line.text();

        self.surface.clear()?;
        self.surface.fill_background();

        let (w, h) = self.surface.measure_text(&text);
        let mut text_rect = Rect::sized(w, h);
        self.text_alignment.resolve(&mut text_rect, &self.panel);
        trace!(%text, %text_rect, "drawing status");

        self.surface.draw_text(&text, text_rect);
        self.surface.flush()?;

        self.frames += 1;
        debug!(frame = self.frames, "frame drawn");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncWriteExt, BufReader};

    use super::*;

    /// 记录调用序列的假面板，每个字符宽 8 像素、高 20 像素
    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<String>,
        drawn: Vec<(String, Rect)>,
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self) -> Result<()> {
            self.calls.push("clear".into());
            Ok(())
        }

        fn fill_background(&mut self) {
            self.calls.push("background".into());
        }

        fn measure_text(&mut self, text: &str) -> (i32, i32) {
            self.calls.push("measure".into());
            (text.chars().count() as i32 * 8, 20)
        }

        fn draw_text(&mut self, text: &str, rect: Rect) {
            self.calls.push("draw".into());
            self.drawn.push((text.to_string(), rect));
        }

        fn flush(&mut self) -> Result<()> {
            self.calls.push("flush".into());
            Ok(())
        }
    }

    fn centered_loop() -> RenderLoop<RecordingSurface> {
        let text_alignment = Alignment {
            bottom: light_status_geometry::Align::Center,
            right: light_status_geometry::Align::Center,
            ..Alignment::default()
        };
        RenderLoop::new(RecordingSurface::default(), Rect::sized(1000, 70), text_alignment, 2048)
    }

    #[tokio::test]
    async fn single_line_then_end_of_stream() {
        let mut render = centered_loop();
        let mut reader = BufReader::new(&b"CPU: 12%\n"[..]);
        let cancel = CancellationToken::new();

        let termination = render.run(&mut reader, &cancel).await.unwrap();

        assert_eq!(termination, Termination::EndOfStream);
        assert_eq!(render.state(), LoopState::Terminated);
        assert_eq!(render.frames(), 1);
        let surface = render.surface();
        assert_eq!(surface.calls, ["clear", "background", "measure", "draw", "flush"]);
        assert_eq!(
            surface.drawn,
            vec![("CPU: 12%".to_string(), Rect::new(468, 25, 64, 20))]
        );
    }

    #[tokio::test]
    async fn every_line_is_a_separate_frame() {
        let mut render = centered_loop();
        let mut reader = BufReader::new(&b"a\nbb\nline\nwith\nnewlines"[..]);

        render.run(&mut reader, &CancellationToken::new()).await.unwrap();

        let texts: Vec<_> = render.surface().drawn.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(texts, ["a", "bb", "line", "with", "newlines"]);
        assert_eq!(render.frames(), 5);
    }

    #[tokio::test]
    async fn empty_stream_draws_nothing() {
        let mut render = centered_loop();
        let mut reader = BufReader::new(&b""[..]);

        let termination = render.run(&mut reader, &CancellationToken::new()).await.unwrap();

        assert_eq!(termination, Termination::EndOfStream);
        assert!(render.surface().calls.is_empty());
    }

    #[tokio::test]
    async fn cancellation_interrupts_a_blocked_read() {
        let mut render = centered_loop();
        let (mut writer, reader) = tokio::io::duplex(64);
        let mut reader = BufReader::new(reader);
        let cancel = CancellationToken::new();

        writer.write_all(b"first\n").await.unwrap();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let termination = render.run(&mut reader, &cancel).await.unwrap();

        assert_eq!(termination, Termination::Cancelled);
        assert_eq!(render.state(), LoopState::Terminated);
        assert_eq!(render.frames(), 1);
        drop(writer);
    }
}
