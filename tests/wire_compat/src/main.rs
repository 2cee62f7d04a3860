fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::sync::Arc;
    use std::time::Duration;

    use skyhaul_highway::frame::{FRAME_END, FRAME_START};
    use skyhaul_highway::{
        Endpoint, FixedSequence, FrameBuilder, HighwayConfig, Payload, RandomSequence,
        SequenceSource, TransferSession, Uploader,
    };
    use skyhaul_protocol::constants::{APP_ID, DATA_FLAG, LOCALE_ID, UPLOAD_COMMAND};
    use skyhaul_protocol::{ContentDigest, Md5Digest};
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    // --- Minimal protobuf reader, enough to check what the server sees ---

    #[derive(Debug, Clone)]
    enum Field {
        Varint(u64),
        Bytes(Vec<u8>),
    }

    fn read_varint(buf: &[u8], pos: &mut usize) -> u64 {
        let mut value = 0u64;
        let mut shift = 0;
        loop {
            let byte = buf[*pos];
            *pos += 1;
            value |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return value;
            }
            shift += 7;
        }
    }

    fn read_fields(buf: &[u8]) -> Vec<(u32, Field)> {
        let mut fields = Vec::new();
        let mut pos = 0;
        while pos < buf.len() {
            let key = read_varint(buf, &mut pos);
            let field = (key >> 3) as u32;
            match key & 0x07 {
                0 => fields.push((field, Field::Varint(read_varint(buf, &mut pos)))),
                2 => {
                    let len = read_varint(buf, &mut pos) as usize;
                    fields.push((field, Field::Bytes(buf[pos..pos + len].to_vec())));
                    pos += len;
                }
                other => panic!("unexpected wire type {other}"),
            }
        }
        fields
    }

    fn varint(fields: &[(u32, Field)], number: u32) -> u64 {
        match fields.iter().find(|(n, _)| *n == number) {
            Some((_, Field::Varint(v))) => *v,
            other => panic!("field {number} is not a varint: {other:?}"),
        }
    }

    fn bytes(fields: &[(u32, Field)], number: u32) -> Vec<u8> {
        match fields.iter().find(|(n, _)| *n == number) {
            Some((_, Field::Bytes(b))) => b.clone(),
            other => panic!("field {number} is not length-delimited: {other:?}"),
        }
    }

    /// One chunk as decoded from the wire.
    #[derive(Debug)]
    struct WireChunk {
        uin: String,
        command: String,
        seq: u32,
        command_id: u32,
        file_size: u64,
        offset: u64,
        length: u32,
        ticket: Vec<u8>,
        md5: Vec<u8>,
        file_md5: Vec<u8>,
        data: Vec<u8>,
    }

    /// Splits a captured connection into frames and decodes each head.
    fn parse_stream(buf: &[u8]) -> Vec<WireChunk> {
        let mut chunks = Vec::new();
        let mut pos = 0;
        while pos < buf.len() {
            assert_eq!(buf[pos], FRAME_START, "start marker at {pos}");
            let head_len = u32::from_be_bytes(buf[pos + 1..pos + 5].try_into().unwrap()) as usize;
            let head = read_fields(&buf[pos + 5..pos + 5 + head_len]);
            pos += 5 + head_len;

            let base = read_fields(&bytes(&head, 1));
            let segment = read_fields(&bytes(&head, 2));
            assert!(bytes(&head, 3).is_empty());

            assert_eq!(varint(&base, 1), 1);
            assert_eq!(varint(&base, 6), u64::from(APP_ID));
            assert_eq!(varint(&base, 7), u64::from(DATA_FLAG));
            assert_eq!(varint(&base, 10), u64::from(LOCALE_ID));

            let length = varint(&segment, 4) as u32;
            let data = buf[pos..pos + length as usize].to_vec();
            pos += length as usize;
            assert_eq!(buf[pos], FRAME_END, "end marker at {pos}");
            pos += 1;

            chunks.push(WireChunk {
                uin: String::from_utf8(bytes(&base, 2)).unwrap(),
                command: String::from_utf8(bytes(&base, 3)).unwrap(),
                seq: varint(&base, 4) as u32,
                command_id: varint(&base, 8) as u32,
                file_size: varint(&segment, 2),
                offset: varint(&segment, 3),
                length,
                ticket: bytes(&segment, 6),
                md5: bytes(&segment, 8),
                file_md5: bytes(&segment, 9),
                data,
            });
        }
        chunks
    }

    // --- Loopback highway server ---

    async fn bind() -> (TcpListener, Endpoint) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, Endpoint::from_ipv4(Ipv4Addr::LOCALHOST, port))
    }

    /// Accepts connections until the listener stays idle, capturing each stream.
    async fn capture(listener: TcpListener) -> Vec<Vec<u8>> {
        let mut streams = Vec::new();
        while let Ok(Ok((mut stream, _))) =
            tokio::time::timeout(Duration::from_millis(500), listener.accept()).await
        {
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf).await.unwrap();
            streams.push(buf);
        }
        streams
    }

    fn uploader(sequence: Arc<dyn SequenceSource>) -> Uploader {
        Uploader::new(TransferSession::new(
            FrameBuilder::default(),
            sequence,
            HighwayConfig::default(),
        ))
    }

    fn payload(seed: u8, size: usize) -> Payload {
        let data: Vec<u8> = (0..size).map(|i| (i as u8).wrapping_mul(seed)).collect();
        let digest = Md5Digest.digest(&data);
        Payload::new(data, digest, vec![seed; 24])
    }

    // --- Tests ---

    #[tokio::test]
    async fn image_upload_wire_layout() {
        let (listener, endpoint) = bind().await;
        let server = tokio::spawn(capture(listener));

        let image = payload(7, 150_000);
        uploader(Arc::new(FixedSequence(777)))
            .upload_images(10001, &[endpoint.address], &[endpoint.port], &[image.clone()])
            .await
            .unwrap();

        let streams = server.await.unwrap();
        assert_eq!(streams.len(), 1);
        let chunks = parse_stream(&streams[0]);

        let lengths: Vec<_> = chunks.iter().map(|c| c.length).collect();
        let offsets: Vec<_> = chunks.iter().map(|c| c.offset).collect();
        let seqs: Vec<_> = chunks.iter().map(|c| c.seq).collect();
        assert_eq!(lengths, vec![65536, 65536, 18928]);
        assert_eq!(offsets, vec![0, 65536, 131072]);
        assert_eq!(seqs, vec![777, 778, 779]);

        let mut rebuilt = Vec::new();
        for c in &chunks {
            assert_eq!(c.uin, "10001");
            assert_eq!(c.command, UPLOAD_COMMAND);
            assert_eq!(c.command_id, 2);
            assert_eq!(c.file_size, 150_000);
            assert_eq!(c.ticket, image.transfer_key);
            assert_eq!(c.file_md5, image.content_digest);
            assert_eq!(c.md5, Md5Digest.digest(&c.data));
            rebuilt.extend_from_slice(&c.data);
        }
        assert_eq!(&rebuilt[..], &image.bytes.unwrap()[..]);
    }

    #[tokio::test]
    async fn group_message_uses_its_command_id() {
        let (listener, endpoint) = bind().await;
        let server = tokio::spawn(capture(listener));

        uploader(Arc::new(FixedSequence(1)))
            .upload_group_message(42, &[endpoint.address], &[endpoint.port], &payload(3, 500))
            .await
            .unwrap();

        let streams = server.await.unwrap();
        let chunks = parse_stream(&streams[0]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].command_id, 27);
        assert_eq!(chunks[0].uin, "42");
    }

    #[tokio::test]
    async fn random_start_sequence_counts_up() {
        let (listener, endpoint) = bind().await;
        let server = tokio::spawn(capture(listener));

        uploader(Arc::new(RandomSequence))
            .upload_images(1, &[endpoint.address], &[endpoint.port], &[payload(5, 300_000)])
            .await
            .unwrap();

        let streams = server.await.unwrap();
        let chunks = parse_stream(&streams[0]);
        assert_eq!(chunks.len(), 5);
        let first = chunks[0].seq;
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.seq, first.wrapping_add(i as u32));
        }
    }

    #[tokio::test]
    async fn batch_assignment_across_two_endpoints() {
        let (l0, e0) = bind().await;
        let (l1, e1) = bind().await;
        let s0 = tokio::spawn(capture(l0));
        let s1 = tokio::spawn(capture(l1));

        let images = vec![payload(1, 1000), payload(2, 2000), payload(3, 3000)];
        uploader(Arc::new(FixedSequence(10)))
            .upload_images(1, &[e0.address, e1.address], &[e0.port, e1.port], &images)
            .await
            .unwrap();

        let digests = |streams: Vec<Vec<u8>>| -> Vec<Vec<u8>> {
            let mut d: Vec<_> = streams
                .iter()
                .map(|s| parse_stream(s)[0].file_md5.clone())
                .collect();
            d.sort();
            d
        };

        let mut expected0 = vec![
            images[0].content_digest.clone(),
            images[2].content_digest.clone(),
        ];
        expected0.sort();
        assert_eq!(digests(s0.await.unwrap()), expected0);
        assert_eq!(
            digests(s1.await.unwrap()),
            vec![images[1].content_digest.clone()]
        );
    }
}
