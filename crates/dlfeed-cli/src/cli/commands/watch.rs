//! `dlfeed watch` – follow the live channel and print what happens.

use anyhow::Result;
use dlfeed_core::client::LiveClient;
use dlfeed_core::config::DlfeedConfig;
use dlfeed_core::dispatch::{ChannelSink, ClientEvent, ResultLink};
use dlfeed_core::endpoint::Endpoints;
use dlfeed_core::jobs::Job;
use dlfeed_core::message::RecentEntry;
use dlfeed_core::playback_db::{RecordKey, RecordStore};
use dlfeed_core::request::RequestClient;

pub async fn run_watch(cfg: &DlfeedConfig, ask_recent: bool) -> Result<()> {
    let store = RecordStore::open_default_or_disabled().await;
    let client = LiveClient::new(cfg, store)?;
    let (sink, mut events) = ChannelSink::channel();
    let session = client.start(sink).await;
    let mut state = session.subscribe();

    if ask_recent {
        let requests = RequestClient::new(client.endpoints().clone());
        tokio::spawn(async move {
            if let Err(e) = requests.request_recent().await {
                tracing::warn!("could not request recent list: {:#}", e);
            }
        });
    }

    println!("Watching {} (Ctrl-C to stop)", client.endpoints().base());
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *state.borrow_and_update();
                println!("-- {current}");
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                render(&client, event).await;
            }
        }
    }

    let in_flight = session.close().await?;
    if !in_flight.is_empty() {
        println!("{} job(s) still running on the server.", in_flight.len());
    }
    Ok(())
}

async fn render(client: &LiveClient, event: ClientEvent) {
    match event {
        ClientEvent::Status(text) => println!("{}", text.trim_end()),
        ClientEvent::JobChanged(job) => println!("{}", format_job(&job)),
        ClientEvent::JobRemoved(id) => println!("[{id}] done"),
        ClientEvent::ResultReady(ResultLink::Download { download_url }) => {
            println!("ready: {}", resolve(client.endpoints(), &download_url));
        }
        ClientEvent::ResultReady(ResultLink::Stream(link)) => {
            let key = RecordKey::for_track(&link.title, &link.artist);
            let resume = client
                .store()
                .load(&key)
                .await
                .and_then(|r| r.progress())
                .map(|p| format!(" (resume at {p})"))
                .unwrap_or_default();
            println!(
                "stream: {key} {}{resume}",
                resolve(client.endpoints(), &link.download_url)
            );
        }
        ClientEvent::Recent(entries) => {
            println!("recent:");
            for entry in &entries {
                println!("  {}", format_recent(client.store(), client.endpoints(), entry).await);
            }
        }
    }
}

fn resolve(endpoints: &Endpoints, download_url: &str) -> String {
    endpoints
        .resolve(download_url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| download_url.to_string())
}

async fn format_recent(store: &RecordStore, endpoints: &Endpoints, entry: &RecentEntry) -> String {
    let key = RecordKey::for_track(&entry.title, &entry.artist);
    let progress = store
        .load(&key)
        .await
        .and_then(|r| r.progress())
        .map(|p| format!("  [{p}]"))
        .unwrap_or_default();
    format!("{key}  {}{progress}", resolve(endpoints, &entry.url))
}

fn format_job(job: &Job) -> String {
    let mut line = format!("[{}] {:>3.0}%", job.id, job.progress_percent);
    if !job.display_title().is_empty() {
        line.push_str(&format!(" {}", job.display_title()));
    }
    if let Some(mib) = job.file_size_mib() {
        line.push_str(&format!(" ({mib:.2} MiB)"));
    }
    if let Some(eta) = &job.eta {
        line.push_str(&format!(" ETA {eta}"));
    }
    if let Some(status) = job.latest_status() {
        line.push_str(&format!(" | {}", status.trim_end()));
    }
    line
}
