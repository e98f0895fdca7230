mod app;
mod interaction;
mod processing;
mod render;
mod state;
mod ui;

use app::CurveTuneApp;
use eframe::egui;
use eframe::egui_wgpu;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("CurveTune")
            .with_inner_size([1100.0, 860.0])
            .with_min_inner_size([760.0, 600.0]),
        // Configure wgpu for driver stability on Windows.
        wgpu_options: egui_wgpu::WgpuConfiguration {
            present_mode: eframe::wgpu::PresentMode::AutoVsync,
            wgpu_setup: egui_wgpu::WgpuSetup::CreateNew(egui_wgpu::WgpuSetupCreateNew {
                instance_descriptor: eframe::wgpu::InstanceDescriptor {
                    backends: eframe::wgpu::Backends::DX12
                        | eframe::wgpu::Backends::VULKAN
                        | eframe::wgpu::Backends::GL,
                    ..Default::default()
                },
                power_preference: eframe::wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    };

    eframe::run_native(
        "CurveTune",
        options,
        Box::new(|cc| Ok(Box::new(CurveTuneApp::new(cc)))),
    )
}
