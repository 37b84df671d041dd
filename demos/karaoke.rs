use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use melodia_lingua::{
    duet::duet_markup,
    karaoke::{KaraokeBinding, KaraokeSynchronizer, ScrollRequest},
    lyrics::LyricDocument,
    playback::{format_time, PlaybackClock, PlaybackEmitter, PlaybackEvent},
    songs::find_song,
    wav::{encode_wav, probe_track, PcmFormat},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let song = find_song("Row, Row, Row Your Boat").ok_or("song missing")?;
    let doc = LyricDocument::parse(song.lyrics);
    println!("Duet prompt: {}", duet_markup(song.lyrics));

    // Eight seconds of a 440 Hz tone stands in for a synthesized vocal.
    let format = PcmFormat::default();
    let pcm: Vec<u8> = (0..format.sample_rate * 8)
        .map(|n| {
            let t = n as f32 / format.sample_rate as f32;
            ((t * 440.0 * std::f32::consts::TAU).sin() * 8000.0) as i16
        })
        .flat_map(|s| s.to_le_bytes())
        .collect();

    let encode_start = Instant::now();
    let wav = encode_wav(&pcm, format)?;
    println!("Encoded {} bytes in {:.2?}", wav.len(), encode_start.elapsed());

    let duration = probe_track(&wav)?.duration_secs;
    std::fs::write(PathBuf::from("karaoke-demo.wav"), &wav)?;
    println!("Saved to karaoke-demo.wav ({})", format_time(duration));

    let lines: Vec<String> = doc.lines().iter().map(|l| l.to_string()).collect();
    let scrolled = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&scrolled);

    let mut player = PlaybackEmitter::new();
    let binding = KaraokeBinding::attach(
        &mut player,
        KaraokeSynchronizer::new(doc.len()),
        move |request: ScrollRequest| sink.borrow_mut().push(request.line),
    );

    player.emit(PlaybackEvent::LoadedMetadata { duration });
    player.emit(PlaybackEvent::Play);
    let mut t = 0.0;
    while t < duration {
        player.emit(PlaybackEvent::TimeUpdate(PlaybackClock::new(t, Some(duration))));
        t += 0.25;
    }
    player.emit(PlaybackEvent::Ended);
    binding.detach(&mut player);

    for line in scrolled.borrow().iter() {
        println!("♪ {}", lines[*line]);
    }
    Ok(())
}
