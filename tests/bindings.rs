mod common;

use common::{HEIGHT, WIDTH, engine, global};
use luma::platform::{MAX_WINDOW_DIMENSION, PlatformEvent};
use winit::keyboard::KeyCode;

#[test]
fn start_uses_given_window_settings()
{
        let (mut engine, probe) = engine();

        probe.push_batch(vec![PlatformEvent::Quit]);

        engine.run_source("main.lua", r#"Luma.Start("Demo", 320, 200, 10, 20)"#).unwrap();

        let settings = probe.settings().unwrap();

        assert_eq!(settings.title, "Demo");
        assert_eq!((settings.width, settings.height), (320, 200));
        assert_eq!((settings.x, settings.y), (Some(10), Some(20)));
}

#[test]
fn start_falls_back_to_configured_defaults()
{
        let (mut engine, probe) = engine();

        probe.push_batch(vec![PlatformEvent::Quit]);

        engine.run_source("main.lua", r#"Luma.Start(nil, nil, nil, 5)"#).unwrap();

        let settings = probe.settings().unwrap();

        assert_eq!(settings.title, "Test");
        assert_eq!((settings.width, settings.height), (WIDTH, HEIGHT));
        assert_eq!((settings.x, settings.y), (Some(5), None));
}

#[test]
fn start_keeps_a_lone_vertical_position()
{
        let (mut engine, probe) = engine();

        probe.push_batch(vec![PlatformEvent::Quit]);

        engine.run_source(
                "main.lua",
                r#"
                Luma.Start(nil, nil, nil, nil, 12)
                first, second = Luma.Window.GetPos()
                "#,
        )
        .unwrap();

        let settings = probe.settings().unwrap();

        assert_eq!((settings.x, settings.y), (None, Some(12)));
        assert_eq!(global::<i64>(&engine, "first"), 12);
        assert_eq!(global::<i64>(&engine, "second"), 0);
}

#[test]
fn oversized_window_requests_are_clamped_and_still_run_a_frame()
{
        let (mut engine, probe) = engine();

        probe.push_batch(vec![PlatformEvent::Quit]);

        engine.run_source(
                "main.lua",
                r#"
                Luma.Start(nil, 1e10, 1e10)
                start_w, start_h = Luma.Window.GetSize()
                Luma.Window.SetSize(1e10, 1e10)
                set_w, set_h = Luma.Window.GetSize()
                Luma.Window.SetSize(1e10, 24)
                "#,
        )
        .unwrap();

        let max = i64::from(MAX_WINDOW_DIMENSION);

        let settings = probe.settings().unwrap();

        assert_eq!((settings.width, settings.height), (MAX_WINDOW_DIMENSION, MAX_WINDOW_DIMENSION));
        assert_eq!((global::<i64>(&engine, "start_w"), global::<i64>(&engine, "start_h")), (max, max));
        assert_eq!((global::<i64>(&engine, "set_w"), global::<i64>(&engine, "set_h")), (max, max));
        assert_eq!(engine.frames(), 1);
        assert_eq!(probe.last_frame().unwrap().size(), (MAX_WINDOW_DIMENSION, 24));
}

#[test]
fn second_start_is_ignored()
{
        let (mut engine, probe) = engine();

        probe.push_batch(vec![PlatformEvent::Quit]);

        engine.run_source(
                "main.lua",
                r#"
                Luma.Start("First", 30, 30)
                Luma.Start("Second", 40, 40)
                "#,
        )
        .unwrap();

        assert_eq!(probe.settings().unwrap().title, "First");
}

#[test]
fn window_calls_before_start_return_nothing()
{
        let (mut engine, _) = engine();

        engine.run_source(
                "main.lua",
                r##"
                size_count = select("#", Luma.Window.GetSize())
                pos_count = select("#", Luma.Window.GetPos())
                key_count = select("#", Luma.Input.IsKeyDown("A"))
                color_count = select("#", Luma.Drawing.GetColor())
                Luma.Window.SetSize(10, 10)
                Luma.Drawing.FillRect(0, 0, 4, 4)
                "##,
        )
        .unwrap();

        assert_eq!(global::<i64>(&engine, "size_count"), 0);
        assert_eq!(global::<i64>(&engine, "pos_count"), 0);
        assert_eq!(global::<i64>(&engine, "key_count"), 0);
        assert_eq!(global::<i64>(&engine, "color_count"), 0);
}

#[test]
fn window_size_and_position_round_trip()
{
        let (mut engine, probe) = engine();

        probe.push_batch(vec![PlatformEvent::Quit]);

        engine.run_source(
                "main.lua",
                r#"
                Luma.Start("Demo", 100, 80, 10, 20)
                w, h = Luma.Window.GetSize()
                first, second = Luma.Window.GetPos()
                Luma.Window.SetSize(0, 30)
                w2, h2 = Luma.Window.GetSize()
                Luma.Window.SetPos(7, 8)
                "#,
        )
        .unwrap();

        assert_eq!((global::<i64>(&engine, "w"), global::<i64>(&engine, "h")), (100, 80));
        assert_eq!(global::<i64>(&engine, "first"), 20);
        assert_eq!(global::<i64>(&engine, "second"), 10);
        assert_eq!((global::<i64>(&engine, "w2"), global::<i64>(&engine, "h2")), (1, 30));
        assert_eq!(probe.last_frame().unwrap().size(), (1, 30));
}

#[test]
fn key_and_mouse_state_follow_polled_events()
{
        let (mut engine, probe) = engine();

        probe.push_batch(vec![
                PlatformEvent::Key {
                        code: KeyCode::KeyA,
                        pressed: true,
                },
                PlatformEvent::MouseButton {
                        button: 1,
                        pressed: true,
                },
                PlatformEvent::MouseMoved {
                        x: 16,
                        y: 12,
                },
        ]);
        probe.push_batch(vec![
                PlatformEvent::Key {
                        code: KeyCode::KeyA,
                        pressed: false,
                },
                PlatformEvent::Quit,
        ]);

        engine.run_source(
                "main.lua",
                r#"
                frames = {}
                function update(dt)
                        local mx, my = Luma.Input.GetMousePos()
                        local rx, ry = Luma.Input.GetMouseRelPos()
                        frames[#frames + 1] = {
                                down = Luma.Input.IsKeyDown("a"),
                                released = Luma.Input.IsKeyReleased("A"),
                                unknown = Luma.Input.IsKeyDown("NoSuchKey"),
                                left = Luma.Input.IsMouseButtonDown(1),
                                right_up = Luma.Input.IsMouseButtonReleased(3),
                                mx = mx, my = my, rx = rx, ry = ry,
                        }
                end
                Luma.Start()
                "#,
        )
        .unwrap();

        let lua = engine.host().unwrap().lua();

        let first: mlua::Table = lua.load("frames[1]").eval().unwrap();
        let second: mlua::Table = lua.load("frames[2]").eval().unwrap();

        assert!(first.get::<bool>("down").unwrap());
        assert!(!first.get::<bool>("released").unwrap());
        assert!(!first.get::<bool>("unknown").unwrap());
        assert!(first.get::<bool>("left").unwrap());
        assert!(first.get::<bool>("right_up").unwrap());
        assert_eq!(first.get::<i64>("mx").unwrap(), 16);
        assert_eq!(first.get::<i64>("my").unwrap(), 12);
        assert_eq!(first.get::<f64>("rx").unwrap(), 0.25);
        assert_eq!(first.get::<f64>("ry").unwrap(), 0.25);

        assert!(!second.get::<bool>("down").unwrap());
        assert!(second.get::<bool>("released").unwrap());
        assert!(second.get::<bool>("left").unwrap());
}

#[test]
fn focus_loss_releases_everything()
{
        let (mut engine, probe) = engine();

        probe.push_batch(vec![PlatformEvent::Key {
                code: KeyCode::Space,
                pressed: true,
        }]);
        probe.push_batch(vec![PlatformEvent::FocusLost, PlatformEvent::Quit]);

        engine.run_source(
                "main.lua",
                r#"
                seen = {}
                function update() seen[#seen + 1] = Luma.Input.IsKeyDown("Space") end
                Luma.Start()
                "#,
        )
        .unwrap();

        let seen: Vec<bool> = global(&engine, "seen");

        assert_eq!(seen, vec![true, false]);
}

#[test]
fn draw_rect_outlines_and_collapses_to_a_point()
{
        let (mut engine, probe) = engine();

        probe.push_batch(vec![PlatformEvent::Quit]);

        engine.run_source(
                "main.lua",
                r#"
                Luma.Start()
                function render()
                        Luma.Drawing.SetColor(Luma.Color.new(0, 255, 0))
                        Luma.Drawing.DrawRect(0, 0, 4, 4)
                        Luma.Drawing.DrawRect(10, 10)
                        Luma.Drawing.DrawRect(30, 30, 5)
                        Luma.Drawing.FillRect(40, 40, nil, 5)
                        Luma.Drawing.DrawPixel(20, 20)
                        Luma.Drawing.DrawPixel(-1, 500)
                end
                "#,
        )
        .unwrap();

        let frame = probe.last_frame().unwrap();

        let green = [0, 255, 0, 255];
        let black = [0, 0, 0, 255];

        assert_eq!(frame.pixel(0, 0).unwrap().to_array(), green);
        assert_eq!(frame.pixel(3, 3).unwrap().to_array(), green);
        assert_eq!(frame.pixel(1, 1).unwrap().to_array(), black);
        assert_eq!(frame.pixel(10, 10).unwrap().to_array(), green);
        assert_eq!(frame.pixel(11, 10).unwrap().to_array(), black);
        assert_eq!(frame.pixel(20, 20).unwrap().to_array(), green);
        assert_eq!(frame.pixel(30, 30).unwrap().to_array(), black);
        assert_eq!(frame.pixel(40, 40).unwrap().to_array(), black);
}

#[test]
fn draw_and_background_colors_read_back()
{
        let (mut engine, probe) = engine();

        probe.push_batch(vec![PlatformEvent::Quit]);

        engine.run_source(
                "main.lua",
                r#"
                Luma.Start()
                default_draw = tostring(Luma.Drawing.GetColor())
                default_background = tostring(Luma.Background.GetColor())
                Luma.Background.SetColor(Luma.Color.new(1, 2, 3, 4))
                background = tostring(Luma.Background.GetColor())
                "#,
        )
        .unwrap();

        assert_eq!(global::<String>(&engine, "default_draw"), "Color 255, 255, 255, 255");
        assert_eq!(global::<String>(&engine, "default_background"), "Color 0, 0, 0, 255");
        assert_eq!(global::<String>(&engine, "background"), "Color 1, 2, 3, 4");
}

#[test]
fn color_fields_arithmetic_and_equality()
{
        let (mut engine, _) = engine();

        engine.run_source(
                "main.lua",
                r#"
                local c = Luma.Color.new(10, 20, 30)
                defaults = tostring(Luma.Color.new())
                alpha = c.a
                c.r = 300
                clamped = c.r
                c.missing = 5
                missing = c.missing
                scaled = tostring(Luma.Color.new(100, 100, 100, 50) * 2)
                scaled_left = tostring(0.5 * Luma.Color.new(100, 100, 100, 50))
                divided = tostring(Luma.Color.new(100, 50, 20, 9) / 2)
                modulated = tostring(Luma.Color.new(255, 128, 0, 255) * Luma.Color.new(255, 255, 255, 128))
                same = Luma.Color.new(1, 2, 3) == Luma.Color.new(1, 2, 3)
                different = Luma.Color.new(1, 2, 3) == Luma.Color.new(1, 2, 4)
                "#,
        )
        .unwrap();

        assert_eq!(global::<String>(&engine, "defaults"), "Color 0, 0, 0, 255");
        assert_eq!(global::<i64>(&engine, "alpha"), 255);
        assert_eq!(global::<i64>(&engine, "clamped"), 255);
        assert_eq!(global::<mlua::Value>(&engine, "missing"), mlua::Value::Nil);
        assert_eq!(global::<String>(&engine, "scaled"), "Color 200, 200, 200, 50");
        assert_eq!(global::<String>(&engine, "scaled_left"), "Color 50, 50, 50, 50");
        assert_eq!(global::<String>(&engine, "divided"), "Color 50, 25, 10, 9");
        assert_eq!(global::<String>(&engine, "modulated"), "Color 255, 128, 0, 128");
        assert!(global::<bool>(&engine, "same"));
        assert!(!global::<bool>(&engine, "different"));
}

#[test]
fn copy_makes_independent_colors_and_passes_other_values_through()
{
        let (mut engine, _) = engine();

        engine.run_source(
                "main.lua",
                r#"
                local a = Luma.Color.new(1, 2, 3)
                local b, n, s = Luma.Copy(a, 5, "text")
                b.r = 99
                original = a.r
                copied = b.r
                number, text = n, s
                "#,
        )
        .unwrap();

        assert_eq!(global::<i64>(&engine, "original"), 1);
        assert_eq!(global::<i64>(&engine, "copied"), 99);
        assert_eq!(global::<i64>(&engine, "number"), 5);
        assert_eq!(global::<String>(&engine, "text"), "text");
}

#[test]
fn print_does_not_disturb_the_script()
{
        let (mut engine, _) = engine();

        engine.run_source("main.lua", r#"print("hello", 1, nil) done = true"#).unwrap();

        assert!(global::<bool>(&engine, "done"));
}
