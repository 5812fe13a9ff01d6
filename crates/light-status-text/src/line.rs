use std::borrow::Cow;
use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::trace;

use crate::normalize::normalize;

/// 最小容量：至少能放下一个字符和换行
const MIN_CAPACITY: usize = 2;

/// 定长状态行缓冲区，每次读取复用，从不扩容
pub struct StatusLine {
    buf: Box<[u8]>,
    len: usize,
}

impl StatusLine {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity.max(MIN_CAPACITY)].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// 读入下一行（包含换行符），返回读到的字节数，0 表示流已结束
    ///
    /// 超过容量的行在缓冲区边界截断，剩余部分由下一次读取返回。
    pub async fn read_from<R>(&mut self, reader: &mut R) -> io::Result<usize>
    where
        R: AsyncBufRead + Unpin,
    {
        self.len = 0;

        while self.len < self.buf.len() {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                break;
            }

            let room = self.buf.len() - self.len;
            let (take, complete) = match memchr::memchr(b'\n', available) {
                Some(pos) if pos < room => (pos + 1, true),
                _ => (available.len().min(room), false),
            };

            self.buf[self.len..self.len + take].copy_from_slice(&available[..take]);
            reader.consume(take);
            self.len += take;

            if complete {
                break;
            }
        }

        trace!(len = self.len, "status line read");
        Ok(self.len)
    }

    /// 原地规范化当前内容，返回新的长度
    pub fn normalize(&mut self) -> usize {
        self.len = normalize(&mut self.buf[..self.len]);
        self.len
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// 用于绘制的文本；非法的 UTF-8 以替换字符显示
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::BufReader;

    use super::*;

    #[tokio::test]
    async fn reads_one_line_at_a_time() {
        let mut reader = BufReader::new(&b"CPU: 12%\nMEM: 40%\n"[..]);
        let mut line = StatusLine::with_capacity(2048);

        assert_eq!(line.read_from(&mut reader).await.unwrap(), 9);
        assert_eq!(line.as_bytes(), b"CPU: 12%\n");
        assert_eq!(line.read_from(&mut reader).await.unwrap(), 9);
        assert_eq!(line.as_bytes(), b"MEM: 40%\n");
        assert_eq!(line.read_from(&mut reader).await.unwrap(), 0);
        assert!(line.is_empty());
    }

    #[tokio::test]
    async fn last_line_without_newline() {
        let mut reader = BufReader::new(&b"tail"[..]);
        let mut line = StatusLine::with_capacity(64);

        assert_eq!(line.read_from(&mut reader).await.unwrap(), 4);
        assert_eq!(line.normalize(), 4);
        assert_eq!(line.text(), "tail");
        assert_eq!(line.read_from(&mut reader).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn long_line_is_split_at_capacity() {
        let mut reader = BufReader::new(&b"abcdefgh\nz\n"[..]);
        let mut line = StatusLine::with_capacity(5);

        assert_eq!(line.read_from(&mut reader).await.unwrap(), 5);
        assert_eq!(line.as_bytes(), b"abcde");
        assert_eq!(line.read_from(&mut reader).await.unwrap(), 4);
        assert_eq!(line.as_bytes(), b"fgh\n");
        assert_eq!(line.read_from(&mut reader).await.unwrap(), 2);
        assert_eq!(line.as_bytes(), b"z\n");
    }

    #[tokio::test]
    async fn small_reader_buffer_still_yields_whole_lines() {
        let mut reader = BufReader::with_capacity(3, &b"one two three\n"[..]);
        let mut line = StatusLine::with_capacity(64);

        assert_eq!(line.read_from(&mut reader).await.unwrap(), 14);
        assert_eq!(line.normalize(), 13);
        assert_eq!(line.text(), "one two three");
    }

    #[test]
    fn capacity_has_a_floor() {
        assert_eq!(StatusLine::with_capacity(0).capacity(), MIN_CAPACITY);
        assert_eq!(StatusLine::with_capacity(2048).capacity(), 2048);
    }
}
